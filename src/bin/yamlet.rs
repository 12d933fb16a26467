//! Command-line interface for yamlet
//! Reads JSON and writes it back out as YAML using the dump options.
//!
//! Usage:
//!   yamlet [`<path>`] [--config `<file>`] [--indent N] [--width N] [--flow MODE]  - Convert JSON to YAML
//!   yamlet --all `<path>`                                                      - One document per array item
//!
//! Without a path the JSON is read from stdin.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use yamlet::{Dumper, Loader, Value};

fn main() {
    let matches = Command::new("yamlet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert JSON documents to YAML")
        .arg(
            Arg::new("path")
                .help("Path to the JSON file (stdin when omitted)")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file with dump options, layered over the defaults"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .short('i')
                .help("Spaces per indentation level (1-10)")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .help("Preferred line width; zero or negative disables folding")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("flow")
                .long("flow")
                .help("Collection layout")
                .value_parser(["auto", "block", "flow"]),
        )
        .arg(
            Arg::new("canonical")
                .long("canonical")
                .help("Explicit tags, double quotes and document markers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty-flow")
                .long("pretty-flow")
                .help("Break flow collections over several lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explicit-start")
                .long("explicit-start")
                .help("Always write the '---' document marker")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Write each item of a top-level array as its own document")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline decisions to stderr (repeat for more)")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let dumper = build_dumper(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let source = read_source(matches.get_one::<String>("path")).unwrap_or_else(|e| {
        eprintln!("Error reading input: {}", e);
        std::process::exit(1);
    });

    let json: serde_json::Value = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Invalid JSON: {}", e);
        std::process::exit(1);
    });

    let documents = match json {
        serde_json::Value::Array(items) if matches.get_flag("all") => {
            items.into_iter().map(Value::from).collect()
        }
        other => vec![Value::from(other)],
    };

    let output = dumper.dump_all(&documents).unwrap_or_else(|e| {
        eprintln!("Dump error: {}", e);
        std::process::exit(1);
    });

    print!("{}", output);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Layer the config file and flags over the embedded defaults.
fn build_dumper(matches: &ArgMatches) -> Result<Dumper, yamlet::Error> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(indent) = matches.get_one::<i64>("indent") {
        loader = loader.set_override("indent", *indent)?;
    }
    if let Some(width) = matches.get_one::<i64>("width") {
        loader = loader.set_override("line_width", *width)?;
    }
    if let Some(flow) = matches.get_one::<String>("flow") {
        loader = loader.set_override("default_flow_style", flow.as_str())?;
    }
    for flag in ["canonical", "pretty-flow", "explicit-start"] {
        if matches.get_flag(flag) {
            loader = loader.set_override(&flag.replace('-', "_"), true)?;
        }
    }
    let options = loader.build()?;
    log::debug!("dump options: {:?}", options);
    Dumper::new(options)
}

fn read_source(path: Option<&String>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
