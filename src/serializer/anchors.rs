//! Anchor naming strategies.

use crate::config::AnchorNaming;
use crate::model::Node;
use std::collections::HashSet;

/// Produces the anchor name for a node that is written more than once.
///
/// One generator serves a whole stream; names must be unique within a
/// document. `document_finished` is called after each document.
pub trait AnchorGenerator {
    fn next_anchor(&mut self, node: &Node) -> String;

    fn document_finished(&mut self) {}
}

/// `id001`, `id002`, ... The counter continues across documents.
#[derive(Debug, Clone, Default)]
pub struct NumberAnchorGenerator {
    last: usize,
}

impl NumberAnchorGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorGenerator for NumberAnchorGenerator {
    fn next_anchor(&mut self, _node: &Node) -> String {
        self.last += 1;
        format!("id{:03}", self.last)
    }
}

/// Keeps the anchor name a node already carries (e.g. from a parsed
/// document). Nodes without one, or whose name is already taken in the
/// current document, get a sequential name.
#[derive(Debug, Clone, Default)]
pub struct PreserveAnchorGenerator {
    numbers: NumberAnchorGenerator,
    used: HashSet<String>,
}

impl PreserveAnchorGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorGenerator for PreserveAnchorGenerator {
    fn next_anchor(&mut self, node: &Node) -> String {
        if let Some(name) = &node.anchor {
            if self.used.insert(name.clone()) {
                return name.clone();
            }
        }
        loop {
            let name = self.numbers.next_anchor(node);
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }

    fn document_finished(&mut self) {
        self.used.clear();
    }
}

/// The generator selected by the `anchor_naming` option.
pub fn generator_for(naming: AnchorNaming) -> Box<dyn AnchorGenerator> {
    match naming {
        AnchorNaming::Sequential => Box::new(NumberAnchorGenerator::new()),
        AnchorNaming::Preserve => Box::new(PreserveAnchorGenerator::new()),
    }
}
