//! Tree and event model shared by every stage of the pipeline
//!
//! The graph builder produces a [`Tree`], the serializer walks it and produces
//! [`Event`]s, and the emitter consumes those events. Reading pipelines that
//! want to re-emit a parsed document produce the same two shapes.
//!
//! - [`tag`]: type tags and the well-known core schema tags
//! - [`style`]: scalar and collection layout hints
//! - [`comment`]: comment lines attached to nodes and carried by events
//! - [`node`]: arena-backed node tree
//! - [`event`]: the protocol event tagged union

pub mod comment;
pub mod event;
pub mod node;
pub mod style;
pub mod tag;

pub use comment::{CommentKind, CommentLine, NodeComments};
pub use event::{Event, EventKind, ImplicitTuple, Mark, TagDirective, Version};
pub use node::{Node, NodeId, NodeKind, NodeValue, Tree};
pub use style::{FlowStyle, ScalarStyle};
pub use tag::Tag;
