//! Serializer: node trees to protocol events.
//!
//! The serializer brackets a stream with `StreamStart`/`StreamEnd` and wraps
//! each tree handed to [`Serializer::serialize`] in one document. Before a
//! document is written, a pre-pass finds every node reachable more than once
//! (or flagged for anchoring) and names it through the configured
//! [`AnchorGenerator`]. The depth-first walk then writes each such node once
//! with its anchor and every later occurrence as an `Alias`.
//!
//! Events go to an [`EventSink`]: a `Vec<Event>` collects them, an
//! [`Emitter`](crate::emitter::Emitter) turns them into text.

pub mod anchors;

use crate::config::DumpOptions;
use crate::error::{Error, ProtocolError};
use crate::model::{
    CommentLine, Event, EventKind, ImplicitTuple, NodeId, NodeKind, NodeValue, TagDirective, Tree,
    Version,
};
use crate::resolver::{CoreResolver, Resolver};
use anchors::{generator_for, AnchorGenerator};
use log::debug;
use std::collections::{HashMap, HashSet};

pub use anchors::{NumberAnchorGenerator, PreserveAnchorGenerator};

/// Receiver of protocol events.
pub trait EventSink {
    fn emit(&mut self, event: Event) -> Result<(), Error>;
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) -> Result<(), Error> {
        self.push(event);
        Ok(())
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: Event) -> Result<(), Error> {
        (**self).emit(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SerializerState {
    NotStarted,
    Open,
    Closed,
}

pub struct Serializer<S: EventSink> {
    sink: S,
    state: SerializerState,
    resolver: Box<dyn Resolver>,
    anchor_generator: Box<dyn AnchorGenerator>,
    explicit_start: bool,
    explicit_end: bool,
    version: Option<Version>,
    tags: Vec<TagDirective>,
    process_comments: bool,
    anchors: HashMap<NodeId, Option<String>>,
    serialized: HashSet<NodeId>,
    documents: usize,
}

impl<S: EventSink> Serializer<S> {
    pub fn new(sink: S, options: &DumpOptions) -> Result<Self, Error> {
        Ok(Serializer {
            sink,
            state: SerializerState::NotStarted,
            resolver: Box::new(CoreResolver::new()),
            anchor_generator: generator_for(options.anchor_naming),
            explicit_start: options.explicit_start,
            explicit_end: options.explicit_end,
            version: options.yaml_version()?,
            tags: Vec::new(),
            process_comments: options.process_comments,
            anchors: HashMap::new(),
            serialized: HashSet::new(),
            documents: 0,
        })
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_anchor_generator(mut self, generator: impl AnchorGenerator + 'static) -> Self {
        self.anchor_generator = Box::new(generator);
        self
    }

    /// `%TAG` directives written at the start of every document.
    pub fn with_tag_directives(mut self, tags: Vec<TagDirective>) -> Self {
        self.tags = tags;
        self
    }

    pub fn open(&mut self) -> Result<(), Error> {
        match self.state {
            SerializerState::NotStarted => {
                self.sink.emit(Event::stream_start())?;
                self.state = SerializerState::Open;
                Ok(())
            }
            SerializerState::Open => Err(ProtocolError::AlreadyOpened.into()),
            SerializerState::Closed => Err(ProtocolError::Closed.into()),
        }
    }

    pub fn close(&mut self) -> Result<(), Error> {
        match self.state {
            SerializerState::NotStarted => Err(ProtocolError::NotOpened.into()),
            SerializerState::Closed => Err(ProtocolError::Closed.into()),
            SerializerState::Open => {
                self.sink.emit(Event::stream_end())?;
                self.state = SerializerState::Closed;
                Ok(())
            }
        }
    }

    /// Write one tree as one document.
    pub fn serialize(&mut self, tree: &Tree) -> Result<(), Error> {
        match self.state {
            SerializerState::NotStarted => return Err(ProtocolError::NotOpened.into()),
            SerializerState::Closed => return Err(ProtocolError::Closed.into()),
            SerializerState::Open => {}
        }
        let root = tree.root().ok_or(ProtocolError::MissingRoot)?;

        self.documents += 1;
        debug!("serializing document {}", self.documents);
        self.sink.emit(Event::new(EventKind::DocumentStart {
            explicit: self.explicit_start,
            version: self.version,
            tags: self.tags.clone(),
        }))?;
        self.anchors.clear();
        self.serialized.clear();
        self.anchor_node(tree, root)?;
        self.serialize_node(tree, root)?;
        self.sink.emit(Event::document_end(self.explicit_end))?;

        self.anchors.clear();
        self.serialized.clear();
        self.anchor_generator.document_finished();
        Ok(())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn anchor_node(&mut self, tree: &Tree, id: NodeId) -> Result<(), Error> {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let node = tree
                .get(id)
                .ok_or(ProtocolError::UnknownNode(id.index()))?;
            match self.anchors.get(&id) {
                Some(Some(_)) => {}
                Some(None) => {
                    let name = self.anchor_generator.next_anchor(node);
                    debug!("anchor {} assigned to revisited node {}", name, id.index());
                    self.anchors.insert(id, Some(name));
                }
                None => {
                    let anchor = if node.anchor.is_some() || node.shared {
                        let name = self.anchor_generator.next_anchor(node);
                        debug!("anchor {} assigned to node {}", name, id.index());
                        Some(name)
                    } else {
                        None
                    };
                    self.anchors.insert(id, anchor);
                    pending.extend(node.children().into_iter().rev());
                }
            }
        }
        Ok(())
    }

    fn serialize_node(&mut self, tree: &Tree, id: NodeId) -> Result<(), Error> {
        let node = tree
            .get(id)
            .ok_or(ProtocolError::UnknownNode(id.index()))?;
        let anchor = self.anchors.get(&id).cloned().flatten();
        if self.serialized.contains(&id) {
            let name = anchor.ok_or_else(|| {
                ProtocolError::UndefinedAlias(format!("<node {}>", id.index()))
            })?;
            return self.sink.emit(Event::alias(name));
        }
        self.serialized.insert(id);

        self.serialize_comments(&node.comments.block)?;
        match &node.value {
            NodeValue::Scalar { value, style } => {
                let detected = self.resolver.resolve(NodeKind::Scalar, value, true);
                let default = self.resolver.resolve(NodeKind::Scalar, value, false);
                let implicit = ImplicitTuple::new(node.tag == detected, node.tag == default);
                self.sink.emit(Event::new(EventKind::Scalar {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit,
                    value: value.clone(),
                    style: *style,
                }))?;
            }
            NodeValue::Sequence { items, flow_style } => {
                let implicit = node.tag == self.resolver.resolve(NodeKind::Sequence, "", true);
                self.sink.emit(Event::new(EventKind::SequenceStart {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit,
                    flow_style: *flow_style,
                }))?;
                for item in items {
                    self.serialize_node(tree, *item)?;
                }
                self.sink.emit(Event::sequence_end())?;
            }
            NodeValue::Mapping {
                entries,
                flow_style,
            } => {
                let implicit = node.tag == self.resolver.resolve(NodeKind::Mapping, "", true);
                self.sink.emit(Event::new(EventKind::MappingStart {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit,
                    flow_style: *flow_style,
                }))?;
                for (key, value) in entries {
                    self.serialize_node(tree, *key)?;
                    self.serialize_node(tree, *value)?;
                }
                self.sink.emit(Event::mapping_end())?;
            }
        }
        self.serialize_comments(&node.comments.inline)?;
        self.serialize_comments(&node.comments.end)
    }

    fn serialize_comments(&mut self, comments: &[CommentLine]) -> Result<(), Error> {
        if !self.process_comments {
            return Ok(());
        }
        for comment in comments {
            self.sink.emit(Event::from(comment))?;
        }
        Ok(())
    }
}
