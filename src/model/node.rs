//! Arena-backed node tree.
//!
//! Nodes live in a [`Tree`] and refer to their children by [`NodeId`]. A node
//! reachable along several paths (shared value) or along a path through itself
//! (cycle) simply has its id appear more than once; the serializer turns those
//! repeats into anchors and aliases.

use super::comment::NodeComments;
use super::event::Mark;
use super::style::{FlowStyle, ScalarStyle};
use super::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shape of a node, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar {
        value: String,
        style: Option<ScalarStyle>,
    },
    Sequence {
        items: Vec<NodeId>,
        flow_style: FlowStyle,
    },
    Mapping {
        entries: Vec<(NodeId, NodeId)>,
        flow_style: FlowStyle,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Tag,
    /// Explicit anchor request; the name is used by anchor strategies that preserve names
    pub anchor: Option<String>,
    /// Set by the graph builder when the node was reached more than once
    pub shared: bool,
    pub value: NodeValue,
    pub comments: NodeComments,
    pub start_mark: Option<Mark>,
    pub end_mark: Option<Mark>,
}

impl Node {
    pub fn scalar(tag: Tag, value: impl Into<String>, style: Option<ScalarStyle>) -> Self {
        Node::with_value(
            tag,
            NodeValue::Scalar {
                value: value.into(),
                style,
            },
        )
    }

    pub fn sequence(tag: Tag, items: Vec<NodeId>, flow_style: FlowStyle) -> Self {
        Node::with_value(tag, NodeValue::Sequence { items, flow_style })
    }

    pub fn mapping(tag: Tag, entries: Vec<(NodeId, NodeId)>, flow_style: FlowStyle) -> Self {
        Node::with_value(tag, NodeValue::Mapping { entries, flow_style })
    }

    fn with_value(tag: Tag, value: NodeValue) -> Self {
        Node {
            tag,
            anchor: None,
            shared: false,
            value,
            comments: NodeComments::default(),
            start_mark: None,
            end_mark: None,
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_comments(mut self, comments: NodeComments) -> Self {
        self.comments = comments;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.value {
            NodeValue::Scalar { .. } => NodeKind::Scalar,
            NodeValue::Sequence { .. } => NodeKind::Sequence,
            NodeValue::Mapping { .. } => NodeKind::Mapping,
        }
    }

    /// Scalar text, `None` for collections.
    pub fn scalar_value(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True for scalars without a style or with plain style.
    pub fn is_plain_scalar(&self) -> bool {
        matches!(
            self.value,
            NodeValue::Scalar {
                style: None | Some(ScalarStyle::Plain),
                ..
            }
        )
    }

    pub fn set_flow_style(&mut self, style: FlowStyle) {
        match &mut self.value {
            NodeValue::Sequence { flow_style, .. } | NodeValue::Mapping { flow_style, .. } => {
                *flow_style = style
            }
            NodeValue::Scalar { .. } => {}
        }
    }

    /// Ids of the direct children, keys before values.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.value {
            NodeValue::Scalar { .. } => Vec::new(),
            NodeValue::Sequence { items, .. } => items.clone(),
            NodeValue::Mapping { entries, .. } => entries
                .iter()
                .flat_map(|(key, value)| [*key, *value])
                .collect(),
        }
    }
}

/// Owner of the nodes of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Add a node and make it the document root.
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.add(node);
        self.root = Some(id);
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Panics when `id` does not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append an item to a sequence node. Ignored for other kinds.
    pub fn push_item(&mut self, sequence: NodeId, item: NodeId) {
        if let NodeValue::Sequence { items, .. } = &mut self.nodes[sequence.0].value {
            items.push(item);
        }
    }

    /// Append an entry to a mapping node. Ignored for other kinds.
    pub fn push_entry(&mut self, mapping: NodeId, key: NodeId, value: NodeId) {
        if let NodeValue::Mapping { entries, .. } = &mut self.nodes[mapping.0].value {
            entries.push((key, value));
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
