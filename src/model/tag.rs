//! Type tags.
//!
//! A tag is the full URI-like identifier of a node's semantic type, e.g.
//! `tag:yaml.org,2002:str`. Shorthand forms (`!!str`) only exist in the
//! written text; the emitter derives them from the tag prefixes in scope.

use std::borrow::Cow;
use std::fmt;

/// Prefix shared by the core schema tags.
pub const CORE_PREFIX: &str = "tag:yaml.org,2002:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    pub const NULL: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:null"));
    pub const BOOL: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:bool"));
    pub const INT: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:int"));
    pub const FLOAT: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:float"));
    pub const STR: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:str"));
    pub const BINARY: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:binary"));
    pub const TIMESTAMP: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:timestamp"));
    pub const MERGE: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:merge"));
    pub const SEQ: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:seq"));
    pub const MAP: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:map"));

    pub fn new(value: impl Into<String>) -> Self {
        Tag(Cow::Owned(value.into()))
    }

    /// A local tag (`!name`) for application types.
    pub fn local(name: &str) -> Self {
        Tag::new(format!("!{}", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the tags of the core schema (`tag:yaml.org,2002:*`).
    pub fn is_core(&self) -> bool {
        self.0.starts_with(CORE_PREFIX)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::new(value)
    }
}
