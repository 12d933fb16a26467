use super::Emitter;
use crate::config::DumpOptions;
use crate::error::{Error, ProtocolError};
use crate::model::{
    CommentKind, Event, EventKind, FlowStyle, ImplicitTuple, ScalarStyle, Tag, TagDirective,
    Version,
};

fn emit_with(options: &DumpOptions, events: Vec<Event>) -> Result<String, Error> {
    let mut emitter = Emitter::new(Vec::new(), options);
    for event in events {
        emitter.emit(event)?;
    }
    Ok(String::from_utf8(emitter.into_inner()).expect("utf-8 output"))
}

fn emit(options: &DumpOptions, events: Vec<Event>) -> String {
    emit_with(options, events).expect("events to emit")
}

/// Wraps `body` in a single implicit document.
fn document(body: Vec<Event>) -> Vec<Event> {
    let mut events = vec![Event::stream_start(), Event::document_start(false)];
    events.extend(body);
    events.push(Event::document_end(false));
    events.push(Event::stream_end());
    events
}

fn with_comments() -> DumpOptions {
    DumpOptions {
        process_comments: true,
        ..DumpOptions::default()
    }
}

fn pretty() -> DumpOptions {
    DumpOptions {
        process_comments: true,
        pretty_flow: true,
        ..DumpOptions::default()
    }
}

fn plain(value: &str) -> Event {
    Event::scalar(value, None)
}

fn block(text: &str) -> Event {
    Event::comment(CommentKind::Block, text)
}

fn inline(text: &str) -> Event {
    Event::comment(CommentKind::Inline, text)
}

fn blank() -> Event {
    Event::comment(CommentKind::BlankLine, "")
}

fn tagged_scalar(tag: Tag, implicit: ImplicitTuple, value: &str) -> Event {
    Event::new(EventKind::Scalar {
        anchor: None,
        tag: Some(tag),
        implicit,
        value: value.to_string(),
        style: None,
    })
}

#[test]
fn test_empty_stream_writes_nothing() {
    let output = emit(
        &DumpOptions::default(),
        vec![Event::stream_start(), Event::stream_end()],
    );
    assert_eq!(output, "");
}

#[test]
fn test_block_mapping() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("a"),
            plain("1"),
            plain("b"),
            plain("two"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "a: 1\nb: two\n");
}

#[test]
fn test_sequence_under_key_is_indentless() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("list"),
            Event::sequence_start(FlowStyle::Block),
            plain("a"),
            Event::mapping_start(FlowStyle::Block),
            plain("k"),
            plain("v"),
            Event::mapping_end(),
            Event::sequence_end(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "list:\n- a\n- k: v\n");
}

#[test]
fn test_indicator_indent() {
    let options = DumpOptions {
        indent: 4,
        indicator_indent: 2,
        ..DumpOptions::default()
    };
    let output = emit(
        &options,
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("list"),
            Event::sequence_start(FlowStyle::Block),
            plain("a"),
            plain("b"),
            Event::sequence_end(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "list:\n  - a\n  - b\n");
}

#[test]
fn test_flow_collections() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("seq"),
            Event::sequence_start(FlowStyle::Flow),
            plain("a"),
            plain("b"),
            Event::sequence_end(),
            plain("map"),
            Event::mapping_start(FlowStyle::Flow),
            plain("x"),
            plain("1"),
            Event::mapping_end(),
            plain("empty"),
            Event::sequence_start(FlowStyle::Block),
            Event::sequence_end(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "seq: [a, b]\nmap: {x: 1}\nempty: []\n");
}

#[test]
fn test_root_multiline_string_is_literal() {
    let output = emit(&DumpOptions::default(), document(vec![plain("a\nb")]));
    assert_eq!(output, "|-\n  a\n  b\n");
}

#[test]
fn test_unicode_break_is_escaped_not_literal() {
    let output = emit(&DumpOptions::default(), document(vec![plain("a\u{85}b")]));
    assert_eq!(output, "\"a\\Nb\"\n");
    let output = emit(&DumpOptions::default(), document(vec![plain("a\n\u{2028}")]));
    assert_eq!(output, "\"a\\n\\L\"\n");
}

#[test]
fn test_literal_keeps_trailing_newlines() {
    let output = emit(&DumpOptions::default(), document(vec![plain("a\n\n")]));
    assert_eq!(output, "|+\n  a\n\n");
}

#[test]
fn test_folded_doubles_single_breaks() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![Event::scalar("a\nb", Some(ScalarStyle::Folded))]),
    );
    assert_eq!(output, ">-\n  a\n\n  b\n");
}

#[test]
fn test_string_that_resolves_differently_is_quoted() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![tagged_scalar(
            Tag::STR,
            ImplicitTuple::new(false, true),
            "123",
        )]),
    );
    assert_eq!(output, "'123'\n");
}

#[test]
fn test_control_characters_are_escaped() {
    let output = emit(&DumpOptions::default(), document(vec![plain("tab\there\u{1}")]));
    assert_eq!(output, "\"tab\\there\\x01\"\n");
}

#[test]
fn test_non_ascii_escaped_without_allow_unicode() {
    let options = DumpOptions {
        allow_unicode: false,
        ..DumpOptions::default()
    };
    let output = emit(&options, document(vec![plain("caf\u{e9} \u{263a}")]));
    assert_eq!(output, "\"caf\\xE9 \\u263A\"\n");
}

#[test]
fn test_single_quotes_are_doubled() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![Event::scalar("it's", Some(ScalarStyle::SingleQuoted))]),
    );
    assert_eq!(output, "'it''s'\n");
}

#[test]
fn test_plain_scalar_folds_before_crossing_width() {
    let options = DumpOptions {
        line_width: 20,
        ..DumpOptions::default()
    };
    let output = emit(
        &options,
        document(vec![plain(
            "alpha beta gamma delta epsilon zeta eta theta iota kappa",
        )]),
    );
    assert_eq!(
        output,
        "alpha beta gamma\n  delta epsilon zeta\n  eta theta iota\n  kappa\n"
    );
    assert!(output.lines().all(|line| line.chars().count() <= 20));
}

#[test]
fn test_long_word_is_not_split() {
    let options = DumpOptions {
        line_width: 20,
        ..DumpOptions::default()
    };
    let word = "x".repeat(30);
    let output = emit(&options, document(vec![plain(&word)]));
    assert_eq!(output, format!("{}\n", word));
}

#[test]
fn test_negative_width_disables_folding() {
    let options = DumpOptions {
        line_width: -1,
        ..DumpOptions::default()
    };
    let text = "word ".repeat(40);
    let text = text.trim_end();
    let output = emit(&options, document(vec![plain(text)]));
    assert_eq!(output, format!("{}\n", text));
}

#[test]
fn test_anchor_and_alias() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("dummy"),
            plain("test").anchored("id001"),
            plain("conf"),
            Event::sequence_start(FlowStyle::Block),
            Event::alias("id001"),
            Event::sequence_end(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "dummy: &id001 test\nconf:\n- *id001\n");
}

#[test]
fn test_self_referencing_sequence() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::sequence_start(FlowStyle::Block).anchored("id001"),
            Event::alias("id001"),
            Event::sequence_end(),
        ]),
    );
    assert_eq!(output, "&id001\n- *id001\n");
}

#[test]
fn test_alias_as_key_is_followed_by_space() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("k").anchored("a"),
            plain("v"),
            Event::alias("a"),
            plain("w"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "&a k: v\n*a : w\n");
}

#[test]
fn test_undefined_alias_is_rejected() {
    let err = emit_with(&DumpOptions::default(), document(vec![Event::alias("nope")]))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::UndefinedAlias(ref name)) if name == "nope"
    ));
}

#[test]
fn test_invalid_anchor_is_rejected() {
    let err = emit_with(
        &DumpOptions::default(),
        document(vec![plain("x").anchored("a b")]),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Protocol(ProtocolError::InvalidAnchor(_))));
}

#[test]
fn test_two_documents() {
    let output = emit(
        &DumpOptions::default(),
        vec![
            Event::stream_start(),
            Event::document_start(false),
            plain("a"),
            Event::document_end(false),
            Event::document_start(false),
            plain("b"),
            Event::document_end(false),
            Event::stream_end(),
        ],
    );
    assert_eq!(output, "a\n--- b\n");
}

#[test]
fn test_explicit_markers() {
    let output = emit(
        &DumpOptions::default(),
        vec![
            Event::stream_start(),
            Event::document_start(true),
            plain("a"),
            Event::document_end(true),
            Event::stream_end(),
        ],
    );
    assert_eq!(output, "--- a\n...\n");
}

#[test]
fn test_directives() {
    let start = Event::new(EventKind::DocumentStart {
        explicit: false,
        version: Some(Version { major: 1, minor: 1 }),
        tags: vec![TagDirective {
            handle: "!e!".to_string(),
            prefix: "tag:example.com,2000:".to_string(),
        }],
    });
    let output = emit(
        &DumpOptions::default(),
        vec![
            Event::stream_start(),
            start,
            tagged_scalar(
                Tag::new("tag:example.com,2000:thing"),
                ImplicitTuple::none(),
                "x",
            ),
            Event::document_end(false),
            Event::stream_end(),
        ],
    );
    assert_eq!(
        output,
        "%YAML 1.1\n%TAG !e! tag:example.com,2000:\n--- !e!thing 'x'\n"
    );
}

#[test]
fn test_unknown_tag_is_verbatim() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![tagged_scalar(
            Tag::new("tag:example.com,2000:thing"),
            ImplicitTuple::none(),
            "x",
        )]),
    );
    assert_eq!(output, "!<tag:example.com,2000:thing> 'x'\n");
}

#[test]
fn test_canonical() {
    let options = DumpOptions {
        canonical: true,
        ..DumpOptions::default()
    };
    let output = emit(
        &options,
        document(vec![
            Event::new(EventKind::SequenceStart {
                anchor: None,
                tag: Some(Tag::SEQ),
                implicit: true,
                flow_style: FlowStyle::Block,
            }),
            tagged_scalar(Tag::STR, ImplicitTuple::all(), "a"),
            tagged_scalar(Tag::STR, ImplicitTuple::all(), "b"),
            Event::sequence_end(),
        ]),
    );
    assert_eq!(output, "---\n!!seq [\n  !!str \"a\",\n  !!str \"b\",\n]\n");
}

#[test]
fn test_strict_mode_rejects_unsafe_plain() {
    let options = DumpOptions {
        strict: true,
        ..DumpOptions::default()
    };
    let err = emit_with(
        &options,
        document(vec![Event::scalar("a\nb", Some(ScalarStyle::Plain))]),
    )
    .unwrap_err();
    match err {
        Error::Emission(err) => {
            assert_eq!(err.requested, ScalarStyle::Plain);
            assert_eq!(err.safe, ScalarStyle::DoubleQuoted);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unsafe_style_is_widened_without_strict() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![Event::scalar("a: b", Some(ScalarStyle::Plain))]),
    );
    assert_eq!(output, "'a: b'\n");
}

#[test]
fn test_event_out_of_place_is_rejected() {
    let err = emit_with(
        &DumpOptions::default(),
        vec![
            Event::stream_start(),
            Event::document_start(false),
            Event::sequence_end(),
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::UnexpectedEvent {
            found: "SequenceEnd",
            ..
        })
    ));
}

#[test]
fn test_events_after_stream_end_are_rejected() {
    let err = emit_with(
        &DumpOptions::default(),
        vec![Event::stream_start(), Event::stream_end(), plain("late")],
    )
    .unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[test]
fn test_comments_dropped_when_disabled() {
    let output = emit(
        &DumpOptions::default(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            block(" hidden"),
            plain("key"),
            inline(" hidden"),
            plain("value"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "key: value\n");
}

#[test]
fn test_only_comment() {
    let output = emit(&with_comments(), document(vec![block("Hello world!")]));
    assert_eq!(output, "#Hello world!\n");
}

#[test]
fn test_comment_before_scalar() {
    let output = emit(
        &with_comments(),
        document(vec![
            block("Hello world!"),
            Event::scalar("This is the scalar", Some(ScalarStyle::DoubleQuoted)),
        ]),
    );
    assert_eq!(output, "#Hello world!\n\"This is the scalar\"\n");
}

#[test]
fn test_inline_comment_after_key() {
    let output = emit(
        &with_comments(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("key"),
            inline(" Comment"),
            plain("value"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "key: # Comment\n  value\n");
}

#[test]
fn test_inline_comment_lines_align() {
    let output = emit(
        &with_comments(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("key"),
            inline(" Comment"),
            inline(" lines"),
            plain("value"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "key: # Comment\n     # lines\n  value\n");
}

#[test]
fn test_inline_comment_in_literal_header() {
    let output = emit(
        &with_comments(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("abc"),
            inline(" Comment"),
            Event::scalar("def\nhij\n", Some(ScalarStyle::Literal)),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "abc: | # Comment\n  def\n  hij\n");
}

#[test]
fn test_comments_around_sequence() {
    let output = emit(
        &with_comments(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            block(" Comment"),
            plain("list"),
            inline(" InlineComment1"),
            Event::sequence_start(FlowStyle::Block),
            block(" Block Comment"),
            plain("item"),
            inline(" InlineComment2"),
            Event::sequence_end(),
            Event::mapping_end(),
            block(" Comment"),
        ]),
    );
    assert_eq!(
        output,
        "# Comment\nlist: # InlineComment1\n  - # Block Comment\n    item # InlineComment2\n# Comment\n"
    );
}

#[test]
fn test_comment_between_documents() {
    let output = emit(
        &with_comments(),
        vec![
            Event::stream_start(),
            Event::document_start(false),
            Event::mapping_start(FlowStyle::Block),
            plain("key"),
            plain("value"),
            Event::mapping_end(),
            block(" Block Comment"),
            Event::document_end(false),
            Event::document_start(true),
            block(" Block Comment"),
            Event::mapping_start(FlowStyle::Block),
            plain("key"),
            plain("value"),
            Event::mapping_end(),
            Event::document_end(false),
            Event::stream_end(),
        ],
    );
    assert_eq!(
        output,
        "key: value\n# Block Comment\n---\n# Block Comment\nkey: value\n"
    );
}

#[test]
fn test_blank_lines() {
    let output = emit(
        &with_comments(),
        document(vec![
            blank(),
            Event::mapping_start(FlowStyle::Block),
            plain("abc"),
            plain("def"),
            inline(" comment"),
            blank(),
            blank(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "\nabc: def # comment\n\n\n");
}

#[test]
fn test_long_comment_wraps() {
    let options = DumpOptions {
        process_comments: true,
        line_width: 20,
        ..DumpOptions::default()
    };
    let output = emit(
        &options,
        document(vec![block(" one two three four five six"), plain("x")]),
    );
    assert_eq!(output, "# one two three four\n# five six\nx\n");
}

#[test]
fn test_pretty_flow_sequence_with_comments() {
    let output = emit(
        &pretty(),
        document(vec![
            Event::sequence_start(FlowStyle::Flow),
            block(" red"),
            plain("one"),
            block(" blue"),
            plain("two"),
            Event::sequence_end(),
        ]),
    );
    assert_eq!(output, "[\n  # red\n  one,\n  # blue\n  two\n]\n");
}

#[test]
fn test_pretty_flow_mapping_with_comments() {
    let output = emit(
        &pretty(),
        document(vec![
            Event::mapping_start(FlowStyle::Flow),
            block(" I'm first"),
            plain("a"),
            plain("Hello"),
            plain("b"),
            Event::mapping_start(FlowStyle::Flow),
            plain("one"),
            plain("World"),
            block(" also me"),
            plain("two"),
            plain("eee"),
            Event::mapping_end(),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(
        output,
        "{\n  # I'm first\n  a: Hello,\n  b: {\n    one: World,\n    # also me\n    two: eee\n  }\n}\n"
    );
}

#[test]
fn test_pretty_flow_empty_collections_with_comment() {
    let output = emit(
        &pretty(),
        document(vec![
            Event::sequence_start(FlowStyle::Flow),
            block(" nobody home"),
            Event::sequence_end(),
        ]),
    );
    assert_eq!(output, "[\n  # nobody home\n]\n");

    let output = emit(
        &pretty(),
        document(vec![
            Event::mapping_start(FlowStyle::Flow),
            block(" nobody home"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "{\n  # nobody home\n}\n");
}

#[test]
fn test_pretty_flow_empty_collection_stays_on_one_line() {
    let output = emit(
        &pretty(),
        document(vec![
            Event::sequence_start(FlowStyle::Flow),
            Event::sequence_end(),
        ]),
    );
    assert_eq!(output, "[]\n");
}

#[test]
fn test_inline_comment_after_flow_collection() {
    let output = emit(
        &with_comments(),
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("key"),
            Event::sequence_start(FlowStyle::Flow),
            plain("a"),
            plain("b"),
            Event::sequence_end(),
            inline(" trailing"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "key: [a, b] # trailing\n");
}

#[test]
fn test_windows_line_breaks() {
    let options = DumpOptions {
        line_break: crate::config::LineBreak::Windows,
        ..DumpOptions::default()
    };
    let output = emit(
        &options,
        document(vec![
            Event::mapping_start(FlowStyle::Block),
            plain("a"),
            plain("1"),
            plain("b"),
            plain("2"),
            Event::mapping_end(),
        ]),
    );
    assert_eq!(output, "a: 1\r\nb: 2\r\n");
}
