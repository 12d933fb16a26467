//! Events to text.
//!
//! The emitter is a state machine driven one event at a time. It keeps a
//! short queue of lookahead events because some decisions depend on what
//! follows: whether a collection is empty, whether a key fits on one line,
//! and which comments trail the current node. [`Emitter::emit`] queues the
//! incoming event and runs the state machine for as long as enough lookahead
//! is available.
//!
//! Layout decisions:
//!
//! - Block collections nest by `indent` columns; a sequence that is the value
//!   of a mapping key is written "indentless", at the key's column.
//! - Flow collections are used when requested, when already inside a flow
//!   collection, in canonical mode, and for empty collections.
//! - A scalar is written in the requested style when its content allows it,
//!   otherwise in the nearest safe style. See [`Emitter::choose_scalar_style`].
//! - Plain, quoted and folded scalars are folded at single spaces to respect
//!   the line width; a single word longer than the width is never split.

mod analysis;
mod comments;
mod writer;

use self::analysis::{analyze, ScalarAnalysis};
use crate::config::DumpOptions;
use crate::error::{EmissionError, Error, ProtocolError};
use crate::model::{CommentLine, Event, EventKind, ScalarStyle, Version};
use crate::serializer::EventSink;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::io::Write;

static TAG_HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!(?:[0-9A-Za-z_-]*!)?$").unwrap());
static TAG_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z\-#;/?:@&=+$_.~*'()%!]+$").unwrap());

const DEFAULT_TAG_PREFIXES: [(&str, &str); 2] = [("!", "!"), ("tag:yaml.org,2002:", "!!")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StreamStart,
    DocumentStart { first: bool },
    DocumentRoot,
    DocumentEnd,
    FlowSequenceItem { first: bool },
    FlowMappingKey { first: bool },
    FlowMappingSimpleValue,
    FlowMappingValue,
    BlockSequenceItem { first: bool },
    BlockMappingKey { first: bool },
    BlockMappingSimpleValue,
    BlockMappingValue,
    Nothing,
}

/// The layout options the emitter reads, resolved once.
#[derive(Debug, Clone)]
struct Settings {
    canonical: bool,
    pretty_flow: bool,
    best_indent: usize,
    best_width: usize,
    split_lines: bool,
    allow_unicode: bool,
    line_break: &'static str,
    indicator_indent: usize,
    indent_with_indicator: bool,
    strict: bool,
    emit_comments: bool,
    max_simple_key_length: usize,
}

impl From<&DumpOptions> for Settings {
    fn from(options: &DumpOptions) -> Self {
        let best_indent = options.indent.clamp(1, 10);
        let best_width = if options.line_width > (best_indent * 2) as i64 {
            options.line_width as usize
        } else {
            80
        };
        Settings {
            canonical: options.canonical,
            pretty_flow: options.pretty_flow,
            best_indent,
            best_width,
            split_lines: options.split_lines(),
            allow_unicode: options.allow_unicode,
            line_break: options.line_break.as_str(),
            indicator_indent: options.indicator_indent,
            indent_with_indicator: options.indent_with_indicator,
            strict: options.strict,
            emit_comments: options.process_comments,
            max_simple_key_length: options.max_simple_key_length,
        }
    }
}

/// Writes YAML text for a stream of events.
pub struct Emitter<W: Write> {
    writer: W,
    settings: Settings,

    state: State,
    states: Vec<State>,
    events: VecDeque<Event>,
    event: Option<Event>,

    indent: Option<usize>,
    indents: Vec<Option<usize>>,
    flow_level: usize,

    root_context: bool,
    mapping_context: bool,
    simple_key_context: bool,

    column: usize,
    whitespace: bool,
    indention: bool,
    open_ended: bool,

    /// `(prefix, handle)` in declaration order; later entries win.
    tag_prefixes: Vec<(String, String)>,
    anchors: HashSet<String>,

    analysis: Option<ScalarAnalysis>,
    style: Option<ScalarStyle>,

    block_comments: Vec<CommentLine>,
    inline_comments: Vec<CommentLine>,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W, options: &DumpOptions) -> Self {
        Emitter {
            writer,
            settings: Settings::from(options),
            state: State::StreamStart,
            states: Vec::new(),
            events: VecDeque::new(),
            event: None,
            indent: None,
            indents: Vec::new(),
            flow_level: 0,
            root_context: false,
            mapping_context: false,
            simple_key_context: false,
            column: 0,
            whitespace: true,
            indention: true,
            open_ended: false,
            tag_prefixes: default_tag_prefixes(),
            anchors: HashSet::new(),
            analysis: None,
            style: None,
            block_comments: Vec::new(),
            inline_comments: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Feed one event. Text is written as soon as enough lookahead is queued.
    pub fn emit(&mut self, event: Event) -> Result<(), Error> {
        if event.is_comment() && !self.settings.emit_comments {
            return Ok(());
        }
        self.events.push_back(event);
        while !self.need_more_events() {
            self.event = self.events.pop_front();
            let state = self.state;
            if let Some(event) = &self.event {
                trace!("{:?} <- {}", state, event.kind.name());
            }
            self.step(state)?;
            self.event = None;
        }
        Ok(())
    }

    fn step(&mut self, state: State) -> Result<(), Error> {
        match state {
            State::StreamStart => self.expect_stream_start(),
            State::DocumentStart { first } => self.expect_document_start(first),
            State::DocumentRoot => self.expect_document_root(),
            State::DocumentEnd => self.expect_document_end(),
            State::FlowSequenceItem { first } => self.expect_flow_sequence_item(first),
            State::FlowMappingKey { first } => self.expect_flow_mapping_key(first),
            State::FlowMappingSimpleValue => self.expect_flow_mapping_simple_value(),
            State::FlowMappingValue => self.expect_flow_mapping_value(),
            State::BlockSequenceItem { first } => self.expect_block_sequence_item(first),
            State::BlockMappingKey { first } => self.expect_block_mapping_key(first),
            State::BlockMappingSimpleValue => self.expect_block_mapping_simple_value(),
            State::BlockMappingValue => self.expect_block_mapping_value(),
            State::Nothing => Err(self.unexpected("nothing after StreamEnd")),
        }
    }

    /// Document and collection starts need to see part of their content
    /// first; with comments enabled any node waits for its trailing comments.
    fn need_more_events(&self) -> bool {
        let mut queued = self.events.iter().filter(|event| !event.is_comment());
        let Some(head) = queued.next() else {
            return true;
        };
        let count = match head.kind {
            EventKind::DocumentStart { .. } => 1,
            EventKind::SequenceStart { .. } => 2,
            EventKind::MappingStart { .. } => 3,
            EventKind::StreamStart => 2,
            EventKind::StreamEnd => return false,
            _ if self.settings.emit_comments => 1,
            _ => return false,
        };
        let mut level: i32 = 0;
        let mut seen = 0;
        for event in queued {
            seen += 1;
            match event.kind {
                EventKind::DocumentStart { .. }
                | EventKind::SequenceStart { .. }
                | EventKind::MappingStart { .. } => level += 1,
                EventKind::DocumentEnd { .. } | EventKind::SequenceEnd | EventKind::MappingEnd => {
                    level -= 1
                }
                EventKind::StreamEnd => level = -1,
                _ => {}
            }
            if level < 0 {
                return false;
            }
        }
        seen < count
    }

    fn kind(&self) -> Option<&EventKind> {
        self.event.as_ref().map(|event| &event.kind)
    }

    /// The next queued event that is not a comment.
    fn next_structural(&self) -> Option<&EventKind> {
        self.events
            .iter()
            .find(|event| !event.is_comment())
            .map(|event| &event.kind)
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        match self.kind() {
            Some(kind) => ProtocolError::unexpected(expected, kind).into(),
            None => ProtocolError::UnexpectedEnd(expected).into(),
        }
    }

    fn take_event(&mut self, expected: &'static str) -> Result<Event, Error> {
        self.event
            .take()
            .ok_or_else(|| ProtocolError::UnexpectedEnd(expected).into())
    }

    fn pop_state(&mut self) -> Result<State, Error> {
        self.states
            .pop()
            .ok_or_else(|| self.unexpected("an event closing an open node"))
    }

    fn pop_indent(&mut self) -> Option<usize> {
        self.indents.pop().unwrap_or(None)
    }

    fn increase_indent(&mut self, flow: bool, indentless: bool) {
        self.indents.push(self.indent);
        self.indent = match self.indent {
            None if flow => Some(self.settings.best_indent),
            None => Some(0),
            Some(indent) if indentless => Some(indent),
            Some(indent) => Some(indent + self.settings.best_indent),
        };
    }

    fn is_node_event(&self) -> bool {
        matches!(
            self.kind(),
            Some(
                EventKind::Scalar { .. }
                    | EventKind::Alias { .. }
                    | EventKind::SequenceStart { .. }
                    | EventKind::MappingStart { .. }
            )
        )
    }

    // Stream and document states

    fn expect_stream_start(&mut self) -> Result<(), Error> {
        let event = self.take_event("StreamStart")?;
        match event.kind {
            EventKind::StreamStart => {
                self.state = State::DocumentStart { first: true };
                Ok(())
            }
            other => Err(ProtocolError::unexpected("StreamStart", &other).into()),
        }
    }

    fn expect_document_start(&mut self, first: bool) -> Result<(), Error> {
        self.absorb_comments()?;
        self.write_inline_comments()?;
        self.write_block_comment()?;
        let event = self.take_event("DocumentStart")?;
        match event.kind {
            EventKind::DocumentStart {
                explicit,
                version,
                mut tags,
            } => {
                if (version.is_some() || !tags.is_empty()) && self.open_ended {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                if let Some(version) = version {
                    let text = prepare_version(version)?;
                    self.write_version_directive(&text)?;
                }
                self.tag_prefixes = default_tag_prefixes();
                tags.sort_by(|a, b| a.handle.cmp(&b.handle));
                for directive in &tags {
                    prepare_tag_handle(&directive.handle)?;
                    prepare_tag_prefix(&directive.prefix)?;
                    self.tag_prefixes
                        .push((directive.prefix.clone(), directive.handle.clone()));
                    self.write_tag_directive(&directive.handle, &directive.prefix)?;
                }
                let implicit = first
                    && !explicit
                    && !self.settings.canonical
                    && version.is_none()
                    && tags.is_empty()
                    && !self.next_is_empty_scalar();
                if !implicit {
                    self.write_indent()?;
                    self.write_indicator("---", true, false, false)?;
                    if self.settings.canonical {
                        self.write_indent()?;
                    }
                }
                self.anchors.clear();
                debug!("document start, implicit: {}", implicit);
                self.state = State::DocumentRoot;
                Ok(())
            }
            EventKind::StreamEnd => {
                self.writer.flush()?;
                self.state = State::Nothing;
                Ok(())
            }
            other => Err(ProtocolError::unexpected("DocumentStart or StreamEnd", &other).into()),
        }
    }

    /// An empty untagged scalar as the whole document needs an explicit `---`.
    fn next_is_empty_scalar(&self) -> bool {
        matches!(
            self.events.front().map(|event| &event.kind),
            Some(EventKind::Scalar { anchor: None, tag: None, value, .. }) if value.is_empty()
        )
    }

    fn expect_document_root(&mut self) -> Result<(), Error> {
        if self.at_comment() {
            self.absorb_comments()?;
            self.write_block_comment()?;
            if matches!(self.kind(), Some(EventKind::DocumentEnd { .. })) {
                return self.expect_document_end();
            }
        }
        self.states.push(State::DocumentEnd);
        self.expect_node(true, false, false)
    }

    fn expect_document_end(&mut self) -> Result<(), Error> {
        self.absorb_comments()?;
        self.write_inline_comments()?;
        self.write_block_comment()?;
        let event = self.take_event("DocumentEnd")?;
        match event.kind {
            EventKind::DocumentEnd { explicit } => {
                self.write_indent()?;
                if explicit {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                self.writer.flush()?;
                self.state = State::DocumentStart { first: false };
                Ok(())
            }
            other => Err(ProtocolError::unexpected("DocumentEnd", &other).into()),
        }
    }

    // Nodes

    fn expect_node(&mut self, root: bool, mapping: bool, simple_key: bool) -> Result<(), Error> {
        self.root_context = root;
        self.mapping_context = mapping;
        self.simple_key_context = simple_key;
        match self.kind() {
            Some(EventKind::Alias { .. }) => self.expect_alias(),
            Some(EventKind::Scalar { .. }) => {
                self.process_anchor("&")?;
                self.process_tag()?;
                self.expect_scalar()
            }
            Some(EventKind::SequenceStart { flow_style, .. }) => {
                let flow = flow_style.is_flow();
                self.process_anchor("&")?;
                self.process_tag()?;
                if self.flow_level > 0
                    || self.settings.canonical
                    || flow
                    || self.check_empty_sequence()
                {
                    self.expect_flow_sequence()
                } else {
                    self.expect_block_sequence()
                }
            }
            Some(EventKind::MappingStart { flow_style, .. }) => {
                let flow = flow_style.is_flow();
                self.process_anchor("&")?;
                self.process_tag()?;
                if self.flow_level > 0
                    || self.settings.canonical
                    || flow
                    || self.check_empty_mapping()
                {
                    self.expect_flow_mapping()
                } else {
                    self.expect_block_mapping()
                }
            }
            _ => Err(self.unexpected("a node")),
        }
    }

    fn expect_alias(&mut self) -> Result<(), Error> {
        self.process_anchor("*")?;
        if self.simple_key_context {
            // `*a:` would read back as an alias named `a:`.
            self.write_str(" ")?;
            self.whitespace = true;
        }
        self.state = self.pop_state()?;
        Ok(())
    }

    fn expect_scalar(&mut self) -> Result<(), Error> {
        self.increase_indent(true, false);
        self.process_scalar()?;
        self.indent = self.pop_indent();
        self.state = self.pop_state()?;
        Ok(())
    }

    // Flow sequences

    fn expect_flow_sequence(&mut self) -> Result<(), Error> {
        self.write_indicator("[", true, true, false)?;
        self.flow_level += 1;
        self.increase_indent(true, false);
        if self.settings.pretty_flow
            && !matches!(self.events.front().map(|e| &e.kind), Some(EventKind::SequenceEnd))
        {
            self.write_indent()?;
        }
        self.state = State::FlowSequenceItem { first: true };
        Ok(())
    }

    fn expect_flow_sequence_item(&mut self, first: bool) -> Result<(), Error> {
        self.absorb_comments()?;
        if matches!(self.kind(), Some(EventKind::SequenceEnd)) {
            let wrote = self.write_pending_flow_comments()?;
            self.indent = self.pop_indent();
            self.flow_level -= 1;
            if self.settings.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            } else if wrote || (self.settings.pretty_flow && !first) {
                self.write_indent()?;
            }
            self.write_indicator("]", false, false, false)?;
            self.drain_inline_comments()?;
            self.state = self.pop_state()?;
            return Ok(());
        }
        if !self.is_node_event() {
            return Err(self.unexpected("SequenceEnd or a node"));
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        let wrote = self.write_pending_flow_comments()?;
        if wrote || self.flow_break_needed() {
            self.write_indent()?;
        }
        self.states.push(State::FlowSequenceItem { first: false });
        self.expect_node(false, false, false)?;
        self.drain_inline_comments()
    }

    // Flow mappings

    fn expect_flow_mapping(&mut self) -> Result<(), Error> {
        self.write_indicator("{", true, true, false)?;
        self.flow_level += 1;
        self.increase_indent(true, false);
        if self.settings.pretty_flow
            && !matches!(self.events.front().map(|e| &e.kind), Some(EventKind::MappingEnd))
        {
            self.write_indent()?;
        }
        self.state = State::FlowMappingKey { first: true };
        Ok(())
    }

    fn expect_flow_mapping_key(&mut self, first: bool) -> Result<(), Error> {
        self.absorb_comments()?;
        if matches!(self.kind(), Some(EventKind::MappingEnd)) {
            let wrote = self.write_pending_flow_comments()?;
            self.indent = self.pop_indent();
            self.flow_level -= 1;
            if self.settings.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            } else if wrote || (self.settings.pretty_flow && !first) {
                self.write_indent()?;
            }
            self.write_indicator("}", false, false, false)?;
            self.drain_inline_comments()?;
            self.state = self.pop_state()?;
            return Ok(());
        }
        if !self.is_node_event() {
            return Err(self.unexpected("MappingEnd or a node"));
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        let wrote = self.write_pending_flow_comments()?;
        if wrote || self.flow_break_needed() {
            self.write_indent()?;
        }
        if !self.settings.canonical && self.check_simple_key()? {
            self.states.push(State::FlowMappingSimpleValue);
            self.expect_node(false, true, true)
        } else {
            self.write_indicator("?", true, false, false)?;
            self.states.push(State::FlowMappingValue);
            self.expect_node(false, true, false)
        }
    }

    fn expect_flow_mapping_simple_value(&mut self) -> Result<(), Error> {
        self.absorb_comments()?;
        self.write_indicator(":", false, false, false)?;
        self.states.push(State::FlowMappingKey { first: false });
        self.expect_node(false, true, false)
    }

    fn expect_flow_mapping_value(&mut self) -> Result<(), Error> {
        self.absorb_comments()?;
        if self.settings.canonical
            || self.column > self.settings.best_width
            || self.settings.pretty_flow
        {
            self.write_indent()?;
        }
        self.write_indicator(":", true, false, false)?;
        self.states.push(State::FlowMappingKey { first: false });
        self.expect_node(false, true, false)
    }

    fn flow_break_needed(&self) -> bool {
        self.settings.canonical
            || (self.column > self.settings.best_width && self.settings.split_lines)
            || self.settings.pretty_flow
    }

    /// Comments collected inside a flow collection go after the separator,
    /// each on its own line.
    fn write_pending_flow_comments(&mut self) -> Result<bool, Error> {
        let inline = self.write_inline_comments()?;
        let block = self.write_block_comment()?;
        Ok(inline || block)
    }

    // Block sequences

    fn expect_block_sequence(&mut self) -> Result<(), Error> {
        let indentless = self.mapping_context && !self.indention;
        self.increase_indent(false, indentless);
        self.state = State::BlockSequenceItem { first: true };
        Ok(())
    }

    fn expect_block_sequence_item(&mut self, first: bool) -> Result<(), Error> {
        self.absorb_comments()?;
        if !first && matches!(self.kind(), Some(EventKind::SequenceEnd)) {
            // Comments before the end stay queued for whatever follows.
            self.indent = self.pop_indent();
            self.state = self.pop_state()?;
            return Ok(());
        }
        if !self.is_node_event() {
            return Err(self.unexpected("SequenceEnd or a node"));
        }
        self.write_indent()?;
        if !self.settings.indent_with_indicator || first {
            self.write_whitespace(self.settings.indicator_indent)?;
        }
        self.write_indicator("-", true, false, true)?;
        if self.settings.indent_with_indicator && first {
            self.indent = Some(self.indent.unwrap_or(0) + self.settings.indicator_indent);
        }
        if !self.block_comments.is_empty() {
            self.increase_indent(false, false);
            self.write_block_comment()?;
            if matches!(self.kind(), Some(EventKind::Scalar { .. })) && !self.scalar_analysis()?.empty
            {
                self.write_indent()?;
            }
            self.indent = self.pop_indent();
        }
        self.states.push(State::BlockSequenceItem { first: false });
        self.expect_node(false, false, false)?;
        self.drain_inline_comments()
    }

    // Block mappings

    fn expect_block_mapping(&mut self) -> Result<(), Error> {
        self.increase_indent(false, false);
        self.state = State::BlockMappingKey { first: true };
        Ok(())
    }

    fn expect_block_mapping_key(&mut self, first: bool) -> Result<(), Error> {
        self.absorb_comments()?;
        self.write_block_comment()?;
        if !first && matches!(self.kind(), Some(EventKind::MappingEnd)) {
            self.indent = self.pop_indent();
            self.state = self.pop_state()?;
            return Ok(());
        }
        if !self.is_node_event() {
            return Err(self.unexpected("MappingEnd or a node"));
        }
        self.write_indent()?;
        if self.check_simple_key()? {
            self.states.push(State::BlockMappingSimpleValue);
            self.expect_node(false, true, true)
        } else {
            self.write_indicator("?", true, false, true)?;
            self.states.push(State::BlockMappingValue);
            self.expect_node(false, true, false)
        }
    }

    fn expect_block_mapping_simple_value(&mut self) -> Result<(), Error> {
        self.write_indicator(":", false, false, false)?;
        self.write_value_comments()?;
        self.states.push(State::BlockMappingKey { first: false });
        self.expect_node(false, true, false)?;
        self.drain_inline_comments()
    }

    fn expect_block_mapping_value(&mut self) -> Result<(), Error> {
        self.write_indent()?;
        self.write_indicator(":", true, false, true)?;
        self.write_value_comments()?;
        self.states.push(State::BlockMappingKey { first: false });
        self.expect_node(false, true, false)?;
        self.drain_inline_comments()
    }

    /// Comments between `:` and a block mapping value. Inline ones stay on the
    /// `:` line, except for block scalars, which carry them in their header.
    fn write_value_comments(&mut self) -> Result<(), Error> {
        self.absorb_comments()?;
        if !self.is_block_scalar()? && self.write_inline_comments()? {
            self.increase_indent(true, false);
            self.write_indent()?;
            self.indent = self.pop_indent();
        }
        if !self.block_comments.is_empty() {
            self.increase_indent(true, false);
            self.write_block_comment()?;
            self.write_indent()?;
            self.indent = self.pop_indent();
        }
        Ok(())
    }

    /// Whether the current scalar will be written as literal or folded.
    fn is_block_scalar(&mut self) -> Result<bool, Error> {
        let requested = match self.kind() {
            Some(EventKind::Scalar { style, .. }) => *style,
            _ => return Ok(false),
        };
        if self.settings.canonical || self.flow_level > 0 {
            return Ok(false);
        }
        let analysis = self.scalar_analysis()?;
        Ok(analysis.allow_block
            && match requested {
                Some(style) => style.is_block(),
                None => analysis.multiline,
            })
    }

    // Checks

    fn check_empty_sequence(&self) -> bool {
        matches!(self.kind(), Some(EventKind::SequenceStart { .. }))
            && matches!(self.next_structural(), Some(EventKind::SequenceEnd))
    }

    fn check_empty_mapping(&self) -> bool {
        matches!(self.kind(), Some(EventKind::MappingStart { .. }))
            && matches!(self.next_structural(), Some(EventKind::MappingEnd))
    }

    /// A key can be written without `?` when it is short and fits on one line.
    fn check_simple_key(&mut self) -> Result<bool, Error> {
        let (anchor, tag, scalar_length, alias) = match self.kind() {
            Some(EventKind::Alias { anchor }) => (Some(anchor.clone()), None, None, true),
            Some(EventKind::Scalar {
                anchor, tag, value, ..
            }) => (
                anchor.clone(),
                tag.clone(),
                Some(value.chars().count()),
                false,
            ),
            Some(EventKind::SequenceStart { anchor, tag, .. })
            | Some(EventKind::MappingStart { anchor, tag, .. }) => {
                (anchor.clone(), tag.clone(), None, false)
            }
            _ => return Ok(false),
        };
        let mut length = 0;
        if let Some(anchor) = anchor {
            length += prepare_anchor(&anchor)?.chars().count();
        }
        if let Some(tag) = tag {
            length += self.prepare_tag(tag.as_str())?.chars().count();
        }
        let mut single_line_scalar = false;
        if let Some(scalar_length) = scalar_length {
            let analysis = self.scalar_analysis()?;
            length += scalar_length;
            single_line_scalar = !analysis.empty && !analysis.multiline;
        }
        Ok(length < self.settings.max_simple_key_length
            && (alias
                || single_line_scalar
                || self.check_empty_sequence()
                || self.check_empty_mapping()))
    }

    // Anchors, tags and scalar styles

    fn process_anchor(&mut self, indicator: &str) -> Result<(), Error> {
        let anchor = match self.kind() {
            Some(EventKind::Alias { anchor }) => Some(anchor.clone()),
            _ => self
                .event
                .as_ref()
                .and_then(Event::anchor)
                .map(str::to_string),
        };
        let Some(anchor) = anchor else {
            return Ok(());
        };
        let anchor = prepare_anchor(&anchor)?;
        if indicator == "*" {
            if !self.anchors.contains(&anchor) {
                return Err(ProtocolError::UndefinedAlias(anchor).into());
            }
        } else {
            self.anchors.insert(anchor.clone());
        }
        self.write_indicator(&format!("{}{}", indicator, anchor), true, false, false)
    }

    fn process_tag(&mut self) -> Result<(), Error> {
        let canonical = self.settings.canonical;
        let tag = match self.kind() {
            Some(EventKind::Scalar { tag, implicit, .. }) => {
                let (tag, implicit) = (tag.clone(), *implicit);
                let plain = self.scalar_style()? == ScalarStyle::Plain;
                if (!canonical || tag.is_none())
                    && ((plain && implicit.plain) || (!plain && implicit.quoted))
                {
                    return Ok(());
                }
                match tag {
                    Some(tag) => tag.as_str().to_string(),
                    None if implicit.plain => "!".to_string(),
                    None => return Err(ProtocolError::InvalidTag(String::new()).into()),
                }
            }
            Some(EventKind::SequenceStart { tag, implicit, .. })
            | Some(EventKind::MappingStart { tag, implicit, .. }) => {
                if (!canonical || tag.is_none()) && *implicit {
                    return Ok(());
                }
                match tag {
                    Some(tag) => tag.as_str().to_string(),
                    None => return Err(ProtocolError::InvalidTag(String::new()).into()),
                }
            }
            _ => return Ok(()),
        };
        let prepared = self.prepare_tag(&tag)?;
        self.write_indicator(&prepared, true, false, false)
    }

    /// Shorthand for tags under a known prefix, verbatim `!<...>` otherwise.
    fn prepare_tag(&self, tag: &str) -> Result<String, Error> {
        if tag.is_empty() || tag.contains(char::is_whitespace) || tag.contains('>') {
            return Err(ProtocolError::InvalidTag(tag.to_string()).into());
        }
        if tag == "!" {
            return Ok(tag.to_string());
        }
        let shorthand = self
            .tag_prefixes
            .iter()
            .filter(|(prefix, _)| {
                tag.starts_with(prefix.as_str()) && (prefix == "!" || prefix.len() < tag.len())
            })
            .last();
        if let Some((prefix, handle)) = shorthand {
            let suffix = &tag[prefix.len()..];
            if TAG_SUFFIX.is_match(suffix) {
                return Ok(format!("{}{}", handle, suffix));
            }
        }
        Ok(format!("!<{}>", tag))
    }

    fn scalar_analysis(&mut self) -> Result<ScalarAnalysis, Error> {
        if let Some(analysis) = self.analysis {
            return Ok(analysis);
        }
        let analysis = match self.kind() {
            Some(EventKind::Scalar { value, .. }) => analyze(value, self.settings.allow_unicode),
            _ => return Err(self.unexpected("Scalar")),
        };
        self.analysis = Some(analysis);
        Ok(analysis)
    }

    fn scalar_style(&mut self) -> Result<ScalarStyle, Error> {
        if let Some(style) = self.style {
            return Ok(style);
        }
        let style = self.choose_scalar_style()?;
        self.style = Some(style);
        Ok(style)
    }

    /// Precedence: canonical forces double quotes; an unstyled multi-line
    /// value in block context becomes literal; then plain, single-quoted and
    /// double-quoted in that order, each only if the content allows it.
    /// A requested style is kept when the content allows it. Otherwise the
    /// scalar is widened, or rejected in strict mode.
    fn choose_scalar_style(&mut self) -> Result<ScalarStyle, Error> {
        let (requested, implicit) = match self.kind() {
            Some(EventKind::Scalar {
                style, implicit, ..
            }) => (*style, *implicit),
            _ => return Err(self.unexpected("Scalar")),
        };
        if self.settings.canonical {
            return Ok(ScalarStyle::DoubleQuoted);
        }
        let analysis = self.scalar_analysis()?;
        let block_context = self.flow_level == 0 && !self.simple_key_context;
        let chosen = self.safe_style(requested, implicit.plain, &analysis, block_context);

        if let Some(requested) = requested {
            if requested != chosen {
                if self.settings.strict {
                    let value = match self.kind() {
                        Some(EventKind::Scalar { value, .. }) => value.as_str(),
                        _ => "",
                    };
                    return Err(EmissionError::new(requested, chosen, value).into());
                }
                debug!("{} style widened to {}", requested, chosen);
            }
        }
        Ok(chosen)
    }

    fn safe_style(
        &self,
        requested: Option<ScalarStyle>,
        plain_implicit: bool,
        analysis: &ScalarAnalysis,
        block_context: bool,
    ) -> ScalarStyle {
        if requested == Some(ScalarStyle::DoubleQuoted) {
            return ScalarStyle::DoubleQuoted;
        }
        if requested.is_none() && analysis.multiline && block_context && analysis.allow_block {
            return ScalarStyle::Literal;
        }
        let plain_like = matches!(requested, None | Some(ScalarStyle::Plain));
        if plain_like && plain_implicit {
            let awkward_key = self.simple_key_context && (analysis.empty || analysis.multiline);
            let allowed = if self.flow_level > 0 {
                analysis.allow_flow_plain
            } else {
                analysis.allow_block_plain
            };
            if !awkward_key && allowed {
                return ScalarStyle::Plain;
            }
        }
        if let Some(style) = requested.filter(|style| style.is_block()) {
            if block_context && analysis.allow_block {
                return style;
            }
        }
        if (plain_like || requested == Some(ScalarStyle::SingleQuoted))
            && analysis.allow_single_quoted
            && !(self.simple_key_context && analysis.multiline)
        {
            return ScalarStyle::SingleQuoted;
        }
        ScalarStyle::DoubleQuoted
    }

    fn process_scalar(&mut self) -> Result<(), Error> {
        let style = self.scalar_style()?;
        let value = match self.kind() {
            Some(EventKind::Scalar { value, .. }) => value.clone(),
            _ => return Err(self.unexpected("Scalar")),
        };
        let split = !self.simple_key_context && self.settings.split_lines;
        match style {
            ScalarStyle::Plain => self.write_plain(&value, split)?,
            ScalarStyle::SingleQuoted => self.write_single_quoted(&value, split)?,
            ScalarStyle::DoubleQuoted => self.write_double_quoted(&value, split)?,
            ScalarStyle::Literal => self.write_literal(&value)?,
            ScalarStyle::Folded => self.write_folded(&value, split)?,
        }
        self.analysis = None;
        self.style = None;
        Ok(())
    }
}

impl<W: Write> EventSink for Emitter<W> {
    fn emit(&mut self, event: Event) -> Result<(), Error> {
        Emitter::emit(self, event)
    }
}

fn default_tag_prefixes() -> Vec<(String, String)> {
    DEFAULT_TAG_PREFIXES
        .iter()
        .map(|(prefix, handle)| (prefix.to_string(), handle.to_string()))
        .collect()
}

fn prepare_anchor(anchor: &str) -> Result<String, Error> {
    if anchor.is_empty()
        || anchor.contains(char::is_whitespace)
        || anchor.contains(['[', ']', '{', '}', ',', '*', '&'])
    {
        return Err(ProtocolError::InvalidAnchor(anchor.to_string()).into());
    }
    Ok(anchor.to_string())
}

fn prepare_version(version: Version) -> Result<String, Error> {
    if version.major != 1 {
        return Err(ProtocolError::InvalidDirective(format!(
            "unsupported YAML version {}.{}",
            version.major, version.minor
        ))
        .into());
    }
    Ok(format!("{}.{}", version.major, version.minor))
}

fn prepare_tag_handle(handle: &str) -> Result<(), Error> {
    if !TAG_HANDLE.is_match(handle) {
        return Err(ProtocolError::InvalidDirective(format!("bad tag handle {:?}", handle)).into());
    }
    Ok(())
}

fn prepare_tag_prefix(prefix: &str) -> Result<(), Error> {
    if prefix.is_empty() || prefix.contains(char::is_whitespace) {
        return Err(ProtocolError::InvalidDirective(format!("bad tag prefix {:?}", prefix)).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests;
