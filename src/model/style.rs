//! Layout hints for scalars and collections.

use serde::Deserialize;
use std::fmt;

/// How a scalar is written.
///
/// Nodes and events carry `Option<ScalarStyle>`; `None` means "unset, let the
/// emitter infer the narrowest safe style".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_block(self) -> bool {
        matches!(self, ScalarStyle::Literal | ScalarStyle::Folded)
    }
}

impl fmt::Display for ScalarStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarStyle::Plain => "plain",
            ScalarStyle::SingleQuoted => "single-quoted",
            ScalarStyle::DoubleQuoted => "double-quoted",
            ScalarStyle::Literal => "literal",
            ScalarStyle::Folded => "folded",
        };
        f.write_str(name)
    }
}

/// How a collection is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStyle {
    /// Unset: the graph builder picks flow or block from the children
    #[default]
    Auto,
    Block,
    Flow,
}

impl FlowStyle {
    pub fn is_flow(self) -> bool {
        self == FlowStyle::Flow
    }
}
