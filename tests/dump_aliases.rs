//! Shared and recursive values become anchors and aliases.

mod common;

use common::{dump_default, dump_with, reload};
use serde_json::json;
use yamlet::config::AnchorNaming;
use yamlet::error::BuildError;
use yamlet::{dump, DumpOptions, Dumper, Error, FlowStyle, Node, Tag, Tree, Value};

#[test]
fn test_shared_collection_is_written_once() {
    let shared = Value::seq(vec!["x".into()]);
    let root = Value::seq(vec![shared.share(), shared.share(), shared.share()]);
    let text = dump_default(&root);
    assert_eq!(text, "- &id001 [x]\n- *id001\n- *id001\n");
    assert_eq!(reload(&text), json!([["x"], ["x"], ["x"]]));
}

#[test]
fn test_k_references_give_k_minus_one_aliases() {
    let shared = Value::map(vec![("k".into(), "v".into())]);
    let root = Value::map(vec![
        ("a".into(), shared.share()),
        ("b".into(), shared.share()),
        ("c".into(), shared.share()),
        ("d".into(), shared.share()),
    ]);
    let text = dump_default(&root);
    assert_eq!(text.matches("&id001").count(), 1);
    assert_eq!(text.matches("*id001").count(), 3);
    assert_eq!(
        reload(&text),
        json!({"a": {"k": "v"}, "b": {"k": "v"}, "c": {"k": "v"}, "d": {"k": "v"}})
    );
}

#[test]
fn test_equal_but_distinct_values_are_not_aliased() {
    let root = Value::seq(vec![
        Value::seq(vec!["x".into()]),
        Value::seq(vec!["x".into()]),
    ]);
    assert_eq!(dump_default(&root), "- [x]\n- [x]\n");
}

#[test]
fn test_scalars_are_never_aliased() {
    let root = Value::seq(vec!["same".into(), "same".into()]);
    assert_eq!(dump_default(&root), "[same, same]\n");
}

#[test]
fn test_self_reference_terminates() {
    let list = Value::seq(vec![]);
    list.push(list.share());
    assert_eq!(dump_default(&list), "&id001\n- *id001\n");
}

#[test]
fn test_mapping_referring_to_itself() {
    let node = Value::map(vec![("name".into(), "loop".into())]);
    node.insert("next".into(), node.share());
    assert_eq!(dump_default(&node), "&id001\nname: loop\nnext: *id001\n");
}

#[test]
fn test_dereference_copies_shared_values() {
    let options = DumpOptions {
        dereference_aliases: true,
        ..DumpOptions::default()
    };
    let shared = Value::map(vec![("k".into(), "v".into())]);
    let root = Value::map(vec![
        ("first".into(), shared.share()),
        ("second".into(), shared.share()),
    ]);
    assert_eq!(
        dump_with(&root, &options),
        "first: {k: v}\nsecond: {k: v}\n"
    );
}

#[test]
fn test_dereference_rejects_cycles() {
    let options = DumpOptions {
        dereference_aliases: true,
        ..DumpOptions::default()
    };
    let list = Value::seq(vec![]);
    list.push(list.share());
    let err = dump(&list, &options).expect_err("a cycle cannot be copied");
    assert!(matches!(err, Error::Build(BuildError::Cycle { .. })));
}

#[test]
fn test_anchor_numbers_continue_across_documents() {
    let first = Value::seq(vec![]);
    let shared_first = Value::seq(vec!["a".into()]);
    first.push(shared_first.share());
    first.push(shared_first.share());

    let second = Value::seq(vec![]);
    let shared_second = Value::seq(vec!["b".into()]);
    second.push(shared_second.share());
    second.push(shared_second.share());

    let dumper = Dumper::new(DumpOptions::default()).expect("default options are valid");
    let text = dumper.dump_all(&[first, second]).expect("values to dump");
    assert_eq!(
        text,
        "- &id001 [a]\n- *id001\n---\n- &id002 [b]\n- *id002\n"
    );
}

#[test]
fn test_preserved_anchor_names() {
    let options = DumpOptions {
        anchor_naming: AnchorNaming::Preserve,
        ..DumpOptions::default()
    };
    let mut tree = Tree::new();
    let base = tree.add(Node::scalar(Tag::STR, "x", None).with_anchor("base"));
    tree.add_root(Node::sequence(Tag::SEQ, vec![base, base], FlowStyle::Block));

    let text = Dumper::new(options)
        .expect("valid options")
        .dump_trees(&[tree])
        .expect("tree to dump");
    assert_eq!(text, "- &base x\n- *base\n");
    assert_eq!(reload(&text), json!(["x", "x"]));
}
