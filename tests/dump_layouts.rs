//! Layout options end to end. Multi-line outputs are inline snapshots.

mod common;

use common::{dump_default, dump_with, reload, sample_record};
use serde_json::json;
use yamlet::config::LineBreak;
use yamlet::model::{CommentLine, NodeComments};
use yamlet::{DumpOptions, Dumper, FlowStyle, Node, Tag, Tree, Value};

fn block() -> DumpOptions {
    DumpOptions {
        default_flow_style: FlowStyle::Block,
        ..DumpOptions::default()
    }
}

#[test]
fn test_auto_layout() {
    insta::assert_snapshot!(dump_default(&sample_record()), @r"
    name: yamlet
    version: 3
    tags: [yaml, emitter]
    owner: {name: ada, admin: true}
    notes: |-
      first line
      second line
    ");
}

#[test]
fn test_block_layout() {
    insta::assert_snapshot!(dump_with(&sample_record(), &block()), @r"
    name: yamlet
    version: 3
    tags:
    - yaml
    - emitter
    owner:
      name: ada
      admin: true
    notes: |-
      first line
      second line
    ");
}

#[test]
fn test_flow_layout_breaks_past_width() {
    let options = DumpOptions {
        default_flow_style: FlowStyle::Flow,
        ..DumpOptions::default()
    };
    let text = dump_with(&sample_record(), &options);
    insta::assert_snapshot!(text, @r#"
    {name: yamlet, version: 3, tags: [yaml, emitter], owner: {name: ada, admin: true},
      notes: "first line\nsecond line"}
    "#);
    assert_eq!(
        reload(&text),
        json!({
            "name": "yamlet",
            "version": 3,
            "tags": ["yaml", "emitter"],
            "owner": {"name": "ada", "admin": true},
            "notes": "first line\nsecond line"
        })
    );
}

#[test]
fn test_sequence_of_mappings() {
    let value = Value::map(vec![(
        "people".into(),
        Value::seq(vec![
            Value::map(vec![
                ("name".into(), "ada".into()),
                ("langs".into(), Value::seq(vec!["rust".into(), "ocaml".into()])),
            ]),
            Value::map(vec![
                ("name".into(), "bob".into()),
                ("langs".into(), Value::seq(vec![])),
            ]),
        ]),
    )]);
    insta::assert_snapshot!(dump_default(&value), @r"
    people:
    - name: ada
      langs: [rust, ocaml]
    - name: bob
      langs: []
    ");
}

#[test]
fn test_indicator_indent_inside_wider_indent() {
    let options = DumpOptions {
        indent: 4,
        indicator_indent: 2,
        ..block()
    };
    let value = Value::map(vec![(
        "list".into(),
        Value::seq(vec![
            "a".into(),
            Value::map(vec![("k".into(), "v".into()), ("w".into(), "x".into())]),
        ]),
    )]);
    insta::assert_snapshot!(dump_with(&value, &options), @r"
    list:
      - a
      - k: v
        w: x
    ");
}

#[test]
fn test_plain_value_folds_at_width() {
    let options = DumpOptions {
        line_width: 20,
        ..block()
    };
    let value = Value::map(vec![(
        "text".into(),
        "alpha beta gamma delta epsilon zeta".into(),
    )]);
    let text = dump_with(&value, &options);
    insta::assert_snapshot!(text, @r"
    text: alpha beta
      gamma delta
      epsilon zeta
    ");
    assert_eq!(
        reload(&text),
        json!({"text": "alpha beta gamma delta epsilon zeta"})
    );
}

#[test]
fn test_pretty_flow() {
    let options = DumpOptions {
        default_flow_style: FlowStyle::Flow,
        pretty_flow: true,
        ..DumpOptions::default()
    };
    let value = Value::map(vec![
        ("a".into(), "Hello".into()),
        (
            "b".into(),
            Value::map(vec![("one".into(), "World".into()), ("two".into(), "eee".into())]),
        ),
    ]);
    insta::assert_snapshot!(dump_with(&value, &options), @r"
    {
      a: Hello,
      b: {
        one: World,
        two: eee
      }
    }
    ");
}

#[test]
fn test_canonical() {
    let options = DumpOptions {
        canonical: true,
        ..DumpOptions::default()
    };
    let value = Value::seq(vec![Value::Int(1), "a".into()]);
    insta::assert_snapshot!(dump_with(&value, &options), @r#"
    ---
    !!seq [
      !!int "1",
      !!str "a",
    ]
    "#);
}

#[test]
fn test_explicit_document_markers() {
    let options = DumpOptions {
        explicit_start: true,
        explicit_end: true,
        ..DumpOptions::default()
    };
    let value = Value::map(vec![("a".into(), Value::Int(1))]);
    assert_eq!(dump_with(&value, &options), "--- {a: 1}\n...\n");
}

#[test]
fn test_version_directive() {
    let options = DumpOptions {
        version: Some("1.1".to_string()),
        ..DumpOptions::default()
    };
    assert_eq!(dump_with(&"x".into(), &options), "%YAML 1.1\n--- x\n");
}

#[test]
fn test_windows_line_breaks() {
    let options = DumpOptions {
        line_break: LineBreak::Windows,
        ..block()
    };
    let value = Value::map(vec![("a".into(), Value::Int(1)), ("b".into(), Value::Int(2))]);
    assert_eq!(dump_with(&value, &options), "a: 1\r\nb: 2\r\n");
}

#[test]
fn test_comments_from_tree() {
    let options = DumpOptions {
        process_comments: true,
        ..DumpOptions::default()
    };
    let mut tree = Tree::new();
    let key = tree.add(Node::scalar(Tag::STR, "key", None));
    let value = tree.add(Node::scalar(Tag::STR, "value", None).with_comments(NodeComments {
        inline: vec![CommentLine::inline(" note")],
        ..NodeComments::default()
    }));
    tree.add_root(
        Node::mapping(Tag::MAP, vec![(key, value)], FlowStyle::Block).with_comments(
            NodeComments {
                block: vec![CommentLine::block(" Comment")],
                ..NodeComments::default()
            },
        ),
    );

    let dumper = Dumper::new(options).expect("valid options");
    let text = dumper.dump_trees(&[tree]).expect("tree to dump");
    assert_eq!(text, "# Comment\nkey: value # note\n");
    assert_eq!(reload(&text), json!({"key": "value"}));
}
