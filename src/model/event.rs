//! The event protocol between the serializer (or a reading pipeline) and the emitter.
//!
//! A document is a flat, well-nested sequence of events:
//!
//! ```text
//! StreamStart
//!   DocumentStart
//!     MappingStart
//!       Scalar("key") Scalar("value")
//!     MappingEnd
//!   DocumentEnd
//! StreamEnd
//! ```
//!
//! Every `*Start` has exactly one matching `*End`. Comment events may appear
//! between any two structural events.

use super::comment::{CommentKind, CommentLine};
use super::style::{FlowStyle, ScalarStyle};
use super::tag::Tag;

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/// Which tag omissions are lossless for a scalar.
///
/// `plain` is true when a resolver reading the value as a plain scalar would
/// infer the node's tag; `quoted` is true when the node's tag is the one a
/// quoted scalar resolves to (always `str` for the core resolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitTuple {
    pub plain: bool,
    pub quoted: bool,
}

impl ImplicitTuple {
    pub fn new(plain: bool, quoted: bool) -> Self {
        ImplicitTuple { plain, quoted }
    }

    pub fn all() -> Self {
        ImplicitTuple::new(true, true)
    }

    pub fn none() -> Self {
        ImplicitTuple::new(false, false)
    }
}

/// `%YAML major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

/// `%TAG handle prefix`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective {
    pub handle: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart {
        explicit: bool,
        version: Option<Version>,
        tags: Vec<TagDirective>,
    },
    DocumentEnd {
        explicit: bool,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: Option<Tag>,
        implicit: bool,
        flow_style: FlowStyle,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: Option<Tag>,
        implicit: bool,
        flow_style: FlowStyle,
    },
    MappingEnd,
    Scalar {
        anchor: Option<String>,
        tag: Option<Tag>,
        implicit: ImplicitTuple,
        value: String,
        style: Option<ScalarStyle>,
    },
    Alias {
        anchor: String,
    },
    Comment {
        kind: CommentKind,
        text: String,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::StreamStart => "StreamStart",
            EventKind::StreamEnd => "StreamEnd",
            EventKind::DocumentStart { .. } => "DocumentStart",
            EventKind::DocumentEnd { .. } => "DocumentEnd",
            EventKind::SequenceStart { .. } => "SequenceStart",
            EventKind::SequenceEnd => "SequenceEnd",
            EventKind::MappingStart { .. } => "MappingStart",
            EventKind::MappingEnd => "MappingEnd",
            EventKind::Scalar { .. } => "Scalar",
            EventKind::Alias { .. } => "Alias",
            EventKind::Comment { .. } => "Comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub start_mark: Option<Mark>,
    pub end_mark: Option<Mark>,
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Event::new(kind)
    }
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Event {
            kind,
            start_mark: None,
            end_mark: None,
        }
    }

    pub fn with_marks(mut self, start: Mark, end: Mark) -> Self {
        self.start_mark = Some(start);
        self.end_mark = Some(end);
        self
    }

    pub fn stream_start() -> Self {
        Event::new(EventKind::StreamStart)
    }

    pub fn stream_end() -> Self {
        Event::new(EventKind::StreamEnd)
    }

    pub fn document_start(explicit: bool) -> Self {
        Event::new(EventKind::DocumentStart {
            explicit,
            version: None,
            tags: Vec::new(),
        })
    }

    pub fn document_end(explicit: bool) -> Self {
        Event::new(EventKind::DocumentEnd { explicit })
    }

    /// An untagged sequence start.
    pub fn sequence_start(flow_style: FlowStyle) -> Self {
        Event::new(EventKind::SequenceStart {
            anchor: None,
            tag: None,
            implicit: true,
            flow_style,
        })
    }

    pub fn sequence_end() -> Self {
        Event::new(EventKind::SequenceEnd)
    }

    /// An untagged mapping start.
    pub fn mapping_start(flow_style: FlowStyle) -> Self {
        Event::new(EventKind::MappingStart {
            anchor: None,
            tag: None,
            implicit: true,
            flow_style,
        })
    }

    pub fn mapping_end() -> Self {
        Event::new(EventKind::MappingEnd)
    }

    /// An untagged scalar whose tag may be omitted in any style.
    pub fn scalar(value: impl Into<String>, style: Option<ScalarStyle>) -> Self {
        Event::new(EventKind::Scalar {
            anchor: None,
            tag: None,
            implicit: ImplicitTuple::all(),
            value: value.into(),
            style,
        })
    }

    pub fn alias(anchor: impl Into<String>) -> Self {
        Event::new(EventKind::Alias {
            anchor: anchor.into(),
        })
    }

    pub fn comment(kind: CommentKind, text: impl Into<String>) -> Self {
        Event::new(EventKind::Comment {
            kind,
            text: text.into(),
        })
    }

    /// Attach an anchor to a node event. Other events are returned unchanged.
    pub fn anchored(mut self, name: impl Into<String>) -> Self {
        match &mut self.kind {
            EventKind::SequenceStart { anchor, .. }
            | EventKind::MappingStart { anchor, .. }
            | EventKind::Scalar { anchor, .. } => *anchor = Some(name.into()),
            _ => {}
        }
        self
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, EventKind::Comment { .. })
    }

    /// Anchor defined by this event, if any.
    pub fn anchor(&self) -> Option<&str> {
        match &self.kind {
            EventKind::SequenceStart { anchor, .. }
            | EventKind::MappingStart { anchor, .. }
            | EventKind::Scalar { anchor, .. } => anchor.as_deref(),
            _ => None,
        }
    }
}

impl From<&CommentLine> for Event {
    fn from(line: &CommentLine) -> Self {
        let mut event = Event::comment(line.kind, line.text.clone());
        event.start_mark = line.start_mark;
        event.end_mark = line.end_mark;
        event
    }
}
