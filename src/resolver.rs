//! Implicit type resolution.
//!
//! The serializer asks a [`Resolver`] which tag a reader would infer for a
//! node. When that tag matches the node's own tag, the tag is left out of
//! the output. The emitter relies on the same answer to decide whether a
//! string may be written plain: `"123"` resolves to `int`, so a `str`
//! node holding it must be quoted.
//!
//! [`CoreResolver`] recognises the union of the YAML 1.1 and 1.2 core
//! patterns. Writing with the wider set only ever adds quotes, which keeps
//! the output stable under readers of either version.

use crate::model::{NodeKind, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

pub trait Resolver {
    /// The tag a reader would assign to a node of `kind` with `value`.
    ///
    /// `implicit` is true for plain scalars. Quoted scalars and collections
    /// never go through pattern matching.
    fn resolve(&self, kind: NodeKind, value: &str, implicit: bool) -> Tag;
}

static BOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:yes|Yes|YES|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF|y|Y|n|N)$")
        .unwrap()
});

static INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?0b[0-1_]+|[-+]?0o?[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
    )
    .unwrap()
});

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9_]+|[0-9][0-9_]*(?:\.[0-9_]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

static NULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:~|null|Null|NULL|)$").unwrap());

static MERGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:<<)$").unwrap());

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]|[0-9][0-9][0-9][0-9]-[0-9][0-9]?-[0-9][0-9]?(?:[Tt]|[ \t]+)[0-9][0-9]?:[0-9][0-9]:[0-9][0-9](?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9][0-9]?(?::[0-9][0-9])?))?)$",
    )
    .unwrap()
});

/// Resolver for the core schema tags, optionally extended with
/// application patterns.
#[derive(Debug, Clone, Default)]
pub struct CoreResolver {
    extra: Vec<(Tag, Regex)>,
}

impl CoreResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional implicit type. Added patterns are tried before
    /// the built-in ones, in registration order.
    pub fn with_implicit(mut self, tag: Tag, pattern: Regex) -> Self {
        self.extra.push((tag, pattern));
        self
    }

    fn resolve_plain(&self, value: &str) -> Tag {
        if let Some((tag, _)) = self.extra.iter().find(|(_, re)| re.is_match(value)) {
            return tag.clone();
        }
        let builtins: [(&Lazy<Regex>, Tag); 6] = [
            (&NULL, Tag::NULL),
            (&BOOL, Tag::BOOL),
            (&INT, Tag::INT),
            (&FLOAT, Tag::FLOAT),
            (&MERGE, Tag::MERGE),
            (&TIMESTAMP, Tag::TIMESTAMP),
        ];
        builtins
            .into_iter()
            .find(|(re, _)| re.is_match(value))
            .map(|(_, tag)| tag)
            .unwrap_or(Tag::STR)
    }
}

impl Resolver for CoreResolver {
    fn resolve(&self, kind: NodeKind, value: &str, implicit: bool) -> Tag {
        match kind {
            NodeKind::Scalar if implicit => self.resolve_plain(value),
            NodeKind::Scalar => Tag::STR,
            NodeKind::Sequence => Tag::SEQ,
            NodeKind::Mapping => Tag::MAP,
        }
    }
}
