//! # yamlet
//!
//! The write half of a YAML processor: application values in, YAML text out.
//!
//! ## Pipeline
//!
//! ```text
//! Value ──GraphBuilder──▶ Tree ──Serializer──▶ Event* ──Emitter──▶ text
//! ```
//!
//! - [`builder`] turns a value graph into a node [`model::Tree`], keeping shared
//!   values shared and inferring collection styles.
//! - [`serializer`] walks a tree into an event stream, assigning anchors to
//!   nodes that are reached more than once.
//! - [`emitter`] lays out events as text: indentation, scalar styles, folding,
//!   comments and directives.
//! - [`dumper`] chains the three for the common case.
//!
//! Each stage can be driven on its own. Options live in [`config::DumpOptions`]
//! and are loaded from `defaults/yamlet.default.toml` plus user layers.
//!
//! ```
//! use yamlet::{dump, DumpOptions, Value};
//!
//! let value = Value::map(vec![("answer".into(), Value::Int(42))]);
//! assert_eq!(dump(&value, &DumpOptions::default()).unwrap(), "answer: 42\n");
//! ```

pub mod builder;
pub mod config;
pub mod dumper;
pub mod emitter;
pub mod error;
pub mod model;
pub mod resolver;
pub mod serializer;
pub mod value;

pub use builder::{BuildContext, GraphBuilder, Represent};
pub use config::{load_defaults, DumpOptions, Loader};
pub use dumper::{dump, dump_all, emit_events, Dumper};
pub use emitter::Emitter;
pub use error::Error;
pub use model::{Event, EventKind, FlowStyle, Node, NodeId, ScalarStyle, Tag, Tree};
pub use serializer::{EventSink, Serializer};
pub use value::Value;
