//! Helpers shared by the integration tests.
//!
//! Output is read back with `serde_yaml`, an independent YAML reader, so the
//! tests check what a consumer sees rather than our own idea of the format.

#![allow(dead_code)]

use yamlet::{dump, dump_all, DumpOptions, Value};

pub fn dump_default(value: &Value) -> String {
    dump(value, &DumpOptions::default()).expect("value to dump")
}

pub fn dump_with(value: &Value, options: &DumpOptions) -> String {
    dump(value, options).expect("value to dump")
}

/// Parse a single-document stream into JSON-shaped data.
pub fn reload(text: &str) -> serde_json::Value {
    serde_yaml::from_str(text)
        .unwrap_or_else(|e| panic!("output should parse as YAML: {}\n---\n{}", e, text))
}

/// Parse every document of a stream.
pub fn reload_all(text: &str) -> Vec<serde_json::Value> {
    serde_yaml::Deserializer::from_str(text)
        .map(|document| {
            serde::Deserialize::deserialize(document)
                .unwrap_or_else(|e| panic!("document should parse: {}\n---\n{}", e, text))
        })
        .collect()
}

/// Dump `json` with `options` and check a reader gets the same data back.
pub fn assert_reloads_with(json: &serde_json::Value, options: &DumpOptions) -> String {
    let text = dump_with(&Value::from(json.clone()), options);
    assert_eq!(&reload(&text), json, "reloaded data differs:\n{}", text);
    text
}

pub fn assert_reloads(json: &serde_json::Value) -> String {
    assert_reloads_with(json, &DumpOptions::default())
}

pub fn dump_documents(values: &[Value]) -> String {
    dump_all(values, &DumpOptions::default()).expect("values to dump")
}

/// A small record with every layout case: flow-able leaves, nested blocks
/// and a multi-line string.
pub fn sample_record() -> Value {
    Value::map(vec![
        ("name".into(), "yamlet".into()),
        ("version".into(), Value::Int(3)),
        (
            "tags".into(),
            Value::seq(vec!["yaml".into(), "emitter".into()]),
        ),
        (
            "owner".into(),
            Value::map(vec![
                ("name".into(), "ada".into()),
                ("admin".into(), Value::Bool(true)),
            ]),
        ),
        ("notes".into(), "first line\nsecond line".into()),
    ])
}
