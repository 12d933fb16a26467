//! Comment lines carried by nodes and events.

use super::event::Mark;

/// Where a comment sits relative to the content around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// On its own line, at the current indentation
    Block,
    /// Trailing the content of the current line
    Inline,
    /// An empty line preserved from the source
    BlankLine,
}

/// One comment line. `text` excludes the leading `#`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine {
    pub kind: CommentKind,
    pub text: String,
    pub start_mark: Option<Mark>,
    pub end_mark: Option<Mark>,
}

impl CommentLine {
    pub fn new(kind: CommentKind, text: impl Into<String>) -> Self {
        CommentLine {
            kind,
            text: text.into(),
            start_mark: None,
            end_mark: None,
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self::new(CommentKind::Block, text)
    }

    pub fn inline(text: impl Into<String>) -> Self {
        Self::new(CommentKind::Inline, text)
    }

    pub fn blank_line() -> Self {
        Self::new(CommentKind::BlankLine, "")
    }
}

/// Comments a reading pipeline attached to a node.
///
/// `block` precede the node, `inline` trail it on the same line, and `end`
/// follow it (for collections: after the last child).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeComments {
    pub block: Vec<CommentLine>,
    pub inline: Vec<CommentLine>,
    pub end: Vec<CommentLine>,
}

impl NodeComments {
    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.inline.is_empty() && self.end.is_empty()
    }
}
