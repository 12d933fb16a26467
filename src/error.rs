//! Error taxonomy for the write pipeline
//!
//! Each stage owns one error type:
//!
//! - [`BuildError`]: the graph builder met a value it cannot represent, or a
//!   cycle it is configured not to alias.
//! - [`ProtocolError`]: an event arrived where the current nesting context does not
//!   allow it, or the serializer API was used out of order.
//! - [`EmissionError`]: strict mode refused to widen a requested scalar style.
//!
//! [`Error`] wraps all of them plus invalid options and sink I/O failures, which
//! are passed through untouched. None of these are retried; the caller discards the partial output.

use crate::model::{EventKind, ScalarStyle};
use config::ConfigError;
use std::fmt;
use std::io;

/// Failure while converting an application value into a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// No conversion rule matches the value and no default rule is registered
    NoRule { kind: String, path: String },
    /// A value refers back to one of its ancestors while aliases are disabled
    Cycle { path: String },
    /// A rule rejected the value
    Invalid { path: String, message: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NoRule { kind, path } => {
                write!(f, "no representation rule for {} value at {}", kind, path)
            }
            BuildError::Cycle { path } => write!(
                f,
                "recursive value at {} cannot be written without aliases",
                path
            ),
            BuildError::Invalid { path, message } => write!(f, "invalid value at {}: {}", path, message),
        }
    }
}

impl std::error::Error for BuildError {}

/// Ill-formed event order or API misuse.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// An event is not valid in the current context
    UnexpectedEvent {
        expected: &'static str,
        found: &'static str,
    },
    /// The event stream ended while the emitter still needed events
    UnexpectedEnd(&'static str),
    /// `serialize`/`close` before `open`
    NotOpened,
    /// `open` called twice
    AlreadyOpened,
    /// `serialize`/`close` after `close`
    Closed,
    /// An anchor name that cannot be written
    InvalidAnchor(String),
    /// A tag that cannot be written
    InvalidTag(String),
    /// A `%YAML` or `%TAG` directive that cannot be written
    InvalidDirective(String),
    /// An alias refers to an anchor not defined earlier in the document
    UndefinedAlias(String),
    /// A tree without a root node was handed to the serializer
    MissingRoot,
    /// A node id that does not belong to the tree being serialized
    UnknownNode(usize),
}

impl ProtocolError {
    pub(crate) fn unexpected(expected: &'static str, found: &EventKind) -> Self {
        ProtocolError::UnexpectedEvent {
            expected,
            found: found.name(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnexpectedEvent { expected, found } => {
                write!(f, "expected {}, but got {}", expected, found)
            }
            ProtocolError::UnexpectedEnd(expected) => {
                write!(f, "event stream ended while expecting {}", expected)
            }
            ProtocolError::NotOpened => write!(f, "serializer is not opened"),
            ProtocolError::AlreadyOpened => write!(f, "serializer is already opened"),
            ProtocolError::Closed => write!(f, "serializer is closed"),
            ProtocolError::InvalidAnchor(anchor) => write!(f, "invalid anchor: {:?}", anchor),
            ProtocolError::InvalidTag(tag) => write!(f, "invalid tag: {:?}", tag),
            ProtocolError::InvalidDirective(message) => write!(f, "invalid directive: {}", message),
            ProtocolError::UndefinedAlias(anchor) => {
                write!(f, "alias refers to undefined anchor {:?}", anchor)
            }
            ProtocolError::MissingRoot => write!(f, "tree has no root node"),
            ProtocolError::UnknownNode(index) => {
                write!(f, "node {} does not belong to this tree", index)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// A requested scalar style is unsafe for the value and strict mode is on.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionError {
    pub requested: ScalarStyle,
    pub safe: ScalarStyle,
    pub excerpt: String,
}

impl EmissionError {
    pub(crate) fn new(requested: ScalarStyle, safe: ScalarStyle, value: &str) -> Self {
        let mut excerpt: String = value.chars().take(32).collect();
        if value.chars().count() > 32 {
            excerpt.push_str("...");
        }
        EmissionError {
            requested,
            safe,
            excerpt,
        }
    }
}

impl fmt::Display for EmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} style is unsafe for {:?}; {} would be required",
            self.requested, self.excerpt, self.safe
        )
    }
}

impl std::error::Error for EmissionError {}

/// Any failure of the write pipeline.
#[derive(Debug)]
pub enum Error {
    Build(BuildError),
    Protocol(ProtocolError),
    Emission(EmissionError),
    Config(ConfigError),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(err) => write!(f, "build error: {}", err),
            Error::Protocol(err) => write!(f, "protocol error: {}", err),
            Error::Emission(err) => write!(f, "emission error: {}", err),
            Error::Config(err) => write!(f, "configuration error: {}", err),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Build(err) => Some(err),
            Error::Protocol(err) => Some(err),
            Error::Emission(err) => Some(err),
            Error::Config(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Build(err)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err)
    }
}

impl From<EmissionError> for Error {
    fn from(err: EmissionError) -> Self {
        Error::Emission(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
