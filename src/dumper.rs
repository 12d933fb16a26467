//! One-call pipelines: values, trees or events to text.
//!
//! [`Dumper`] owns validated options and a [`GraphBuilder`]; the free functions
//! are shorthands for the default rules.

use crate::builder::GraphBuilder;
use crate::config::DumpOptions;
use crate::emitter::Emitter;
use crate::error::Error;
use crate::model::{Event, Tree};
use crate::serializer::Serializer;
use crate::value::Value;
use std::io::{self, Write};

pub struct Dumper {
    options: DumpOptions,
    builder: GraphBuilder,
}

impl Dumper {
    /// Fails with [`Error::Config`] when the options are out of range.
    pub fn new(options: DumpOptions) -> Result<Self, Error> {
        options.validate()?;
        let builder = GraphBuilder::new(&options);
        Ok(Dumper { options, builder })
    }

    /// Replace the default conversion rules.
    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    pub fn dump(&self, value: &Value) -> Result<String, Error> {
        self.dump_all(std::slice::from_ref(value))
    }

    /// One document per value, in order.
    pub fn dump_all(&self, values: &[Value]) -> Result<String, Error> {
        let bytes = self.dump_to(values, Vec::new())?;
        into_string(bytes)
    }

    pub fn dump_to<W: Write>(&self, values: &[Value], writer: W) -> Result<W, Error> {
        let trees = values
            .iter()
            .map(|value| self.builder.build(value))
            .collect::<Result<Vec<_>, _>>()?;
        self.write_trees(&trees, writer)
    }

    /// Serialize prepared trees, e.g. ones carrying comments.
    pub fn dump_trees(&self, trees: &[Tree]) -> Result<String, Error> {
        let bytes = self.write_trees(trees, Vec::new())?;
        into_string(bytes)
    }

    fn write_trees<W: Write>(&self, trees: &[Tree], writer: W) -> Result<W, Error> {
        let emitter = Emitter::new(writer, &self.options);
        let mut serializer = Serializer::new(emitter, &self.options)?;
        serializer.open()?;
        for tree in trees {
            serializer.serialize(tree)?;
        }
        serializer.close()?;
        Ok(serializer.into_inner().into_inner())
    }

    /// Emit a complete event stream, `StreamStart` through `StreamEnd`.
    pub fn emit_events(&self, events: impl IntoIterator<Item = Event>) -> Result<String, Error> {
        let mut emitter = Emitter::new(Vec::new(), &self.options);
        for event in events {
            emitter.emit(event)?;
        }
        into_string(emitter.into_inner())
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

/// Write `value` as a single-document stream.
pub fn dump(value: &Value, options: &DumpOptions) -> Result<String, Error> {
    Dumper::new(options.clone())?.dump(value)
}

pub fn dump_all(values: &[Value], options: &DumpOptions) -> Result<String, Error> {
    Dumper::new(options.clone())?.dump_all(values)
}

pub fn emit_events(
    events: impl IntoIterator<Item = Event>,
    options: &DumpOptions,
) -> Result<String, Error> {
    Dumper::new(options.clone())?.emit_events(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommentLine, FlowStyle, Node, NodeComments, ScalarStyle, Tag};

    #[test]
    fn test_dump_mapping() {
        let value = Value::map(vec![
            ("name".into(), "yamlet".into()),
            ("tags".into(), Value::seq(vec!["a".into(), "b".into()])),
        ]);
        let text = dump(&value, &DumpOptions::default()).expect("value to dump");
        assert_eq!(text, "name: yamlet\ntags: [a, b]\n");
    }

    #[test]
    fn test_dump_all_separates_documents() {
        let text = dump_all(&[Value::Int(1), Value::Int(2)], &DumpOptions::default())
            .expect("values to dump");
        assert_eq!(text, "1\n--- 2\n");
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = DumpOptions {
            indent: 0,
            ..DumpOptions::default()
        };
        assert!(matches!(
            dump(&Value::Null, &options),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_dump_trees_with_comments() {
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
        tree.add_root(Node::mapping(Tag::MAP, vec![(key, value)], FlowStyle::Block));

        let text = Dumper::new(options)
            .expect("valid options")
            .dump_trees(&[tree])
            .expect("tree to dump");
        assert_eq!(text, "key: value # note\n");
    }

    #[test]
    fn test_emit_events() {
        let text = emit_events(
            vec![
                Event::stream_start(),
                Event::document_start(false),
                Event::scalar("hello", Some(ScalarStyle::DoubleQuoted)),
                Event::document_end(false),
                Event::stream_end(),
            ],
            &DumpOptions::default(),
        )
        .expect("events to emit");
        assert_eq!(text, "\"hello\"\n");
    }
}
