//! Comment buckets and comment line output.
//!
//! Comment events are not states of their own. Whenever a state is entered on
//! a comment, the comment and any comments queued behind it move into the
//! block or inline bucket, and the state proceeds with the next structural
//! event. The buckets are written at the positions the states choose.

use super::Emitter;
use crate::error::{Error, ProtocolError};
use crate::model::{CommentKind, CommentLine, Event, EventKind};
use std::io::Write;

/// Byte offset of the space to break `text` at so the head fits in `room`
/// columns. Falls back to the first breakable space when no head fits.
fn comment_split(text: &str, room: usize) -> Option<usize> {
    let mut fitting = None;
    let mut overflowing = None;
    let mut previous_non_space = false;
    for (column, (offset, ch)) in text.char_indices().enumerate() {
        if ch == ' ' && previous_non_space {
            if column <= room {
                fitting = Some(offset);
            } else if overflowing.is_none() {
                overflowing = Some(offset);
            }
        }
        previous_non_space = ch != ' ';
    }
    fitting.or(overflowing)
}

/// Where a comment line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Placement {
    /// After the content already on the line
    Inline,
    /// On a line of its own, at the current indent
    OwnLine,
}

/// An inline comment stays inline only behind content on the same line.
pub(super) fn placement(kind: CommentKind, line_has_content: bool) -> Placement {
    match kind {
        CommentKind::Inline if line_has_content => Placement::Inline,
        _ => Placement::OwnLine,
    }
}

/// One event of lookahead behind the node just written.
///
/// The slot holds the next queued event. An inline comment is taken out of
/// it; anything else ends the trailing comments and goes back to the queue.
#[derive(Debug, Default)]
pub(super) struct TrailingSlot(Option<Event>);

impl TrailingSlot {
    pub(super) fn fill(&mut self, event: Option<Event>) {
        self.0 = event;
    }

    pub(super) fn take_inline(&mut self) -> Option<Event> {
        match &self.0 {
            Some(Event {
                kind:
                    EventKind::Comment {
                        kind: CommentKind::Inline,
                        ..
                    },
                ..
            }) => self.0.take(),
            _ => None,
        }
    }

    pub(super) fn release(&mut self) -> Option<Event> {
        self.0.take()
    }
}

impl<W: Write> Emitter<W> {
    fn bucket(&mut self, event: Event) {
        if let EventKind::Comment { kind, text } = event.kind {
            let line = CommentLine {
                kind,
                text,
                start_mark: event.start_mark,
                end_mark: event.end_mark,
            };
            match kind {
                CommentKind::Inline => self.inline_comments.push(line),
                CommentKind::Block | CommentKind::BlankLine => self.block_comments.push(line),
            }
        }
    }

    pub(super) fn at_comment(&self) -> bool {
        self.event.as_ref().map_or(false, Event::is_comment)
    }

    /// Move the current comment event and the comments queued behind it into
    /// the buckets. Afterwards the current event is structural.
    pub(super) fn absorb_comments(&mut self) -> Result<(), Error> {
        while self.at_comment() {
            if let Some(event) = self.event.take() {
                self.bucket(event);
            }
            self.event = self.events.pop_front();
        }
        if self.event.is_none() {
            return Err(ProtocolError::UnexpectedEnd("an event after the comments").into());
        }
        Ok(())
    }

    /// Pick up inline comments trailing the node just written. Inside flow
    /// collections they wait for the next separator.
    pub(super) fn drain_inline_comments(&mut self) -> Result<(), Error> {
        let mut slot = TrailingSlot::default();
        loop {
            slot.fill(self.events.pop_front());
            match slot.take_inline() {
                Some(event) => self.bucket(event),
                None => break,
            }
        }
        if let Some(event) = slot.release() {
            self.events.push_front(event);
        }
        if self.flow_level == 0 {
            self.write_inline_comments()?;
        }
        Ok(())
    }

    pub(super) fn write_inline_comments(&mut self) -> Result<bool, Error> {
        let comments = std::mem::take(&mut self.inline_comments);
        self.write_comment_lines(&comments)
    }

    pub(super) fn write_block_comment(&mut self) -> Result<bool, Error> {
        if self.block_comments.is_empty() {
            return Ok(false);
        }
        let comments = std::mem::take(&mut self.block_comments);
        self.write_indent()?;
        self.write_comment_lines(&comments)
    }

    /// Write comment lines; later lines line up with the first `#`.
    fn write_comment_lines(&mut self, comments: &[CommentLine]) -> Result<bool, Error> {
        if !self.settings.emit_comments {
            return Ok(false);
        }
        let mut wrote = false;
        let mut indent_columns = 0;
        let mut first = true;
        for comment in comments {
            if comment.kind == CommentKind::BlankLine {
                self.write_line_break(None)?;
                self.write_indent()?;
                wrote = true;
                continue;
            }
            if first {
                first = false;
                let inline = placement(comment.kind, self.column > 0) == Placement::Inline;
                if comment.kind == CommentKind::Inline && !inline {
                    self.write_indent()?;
                }
                self.write_indicator("#", inline, false, false)?;
                indent_columns = self.column.saturating_sub(1);
            } else {
                self.write_whitespace(indent_columns)?;
                self.write_indicator("#", false, false, false)?;
            }
            self.write_comment_text(&comment.text, indent_columns)?;
            self.write_line_break(None)?;
            wrote = true;
        }
        Ok(wrote)
    }

    fn write_comment_text(&mut self, text: &str, indent_columns: usize) -> Result<(), Error> {
        let mut rest = text;
        while self.settings.split_lines
            && self.column + rest.chars().count() > self.settings.best_width
        {
            let room = self.settings.best_width.saturating_sub(self.column);
            let Some(offset) = comment_split(rest, room) else {
                break;
            };
            let (head, tail) = rest.split_at(offset);
            self.write_str(head)?;
            self.write_line_break(None)?;
            self.write_whitespace(indent_columns)?;
            self.write_indicator("#", false, false, false)?;
            rest = tail;
        }
        self.write_str(rest)
    }
}
