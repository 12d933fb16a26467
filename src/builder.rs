//! Graph builder: application values to a node tree.
//!
//! A [`GraphBuilder`] holds conversion rules keyed by value shape (and, for
//! named objects, by type name). [`GraphBuilder::build`] walks a value,
//! dispatches every reachable value to its rule and collects the resulting
//! nodes in a [`Tree`].
//!
//! Sharing and cycles are detected by instance identity. A composite is
//! registered in the identity map before its children are visited, so a
//! second visit (another path to the same instance, or a path through
//! itself) returns the node already allocated and marks it shared. The
//! serializer later writes such nodes once with an anchor and refers back
//! to them with aliases.
//!
//! With `dereference_aliases`, a revisit of a finished value builds a fresh
//! copy instead, and a revisit of a value still under construction is a
//! [`BuildError::Cycle`].

mod rules;

use crate::config::DumpOptions;
use crate::error::BuildError;
use crate::model::{FlowStyle, Node, NodeId, ScalarStyle, Tag, Tree};
use crate::value::{Value, ValueKind};
use log::debug;
use std::collections::HashMap;

/// Converts one value into a node of the tree under construction.
///
/// Rules for composites call back into the [`BuildContext`] to represent
/// their children, which is where identity tracking happens.
pub trait Represent {
    fn represent(&self, value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError>;
}

impl<F> Represent for F
where
    F: Fn(&Value, &mut BuildContext<'_>) -> Result<NodeId, BuildError>,
{
    fn represent(&self, value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        self(value, cx)
    }
}

/// The subset of [`DumpOptions`] that shapes the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSettings {
    pub default_scalar_style: ScalarStyle,
    pub default_flow_style: FlowStyle,
    pub dereference_aliases: bool,
}

impl From<&DumpOptions> for BuildSettings {
    fn from(options: &DumpOptions) -> Self {
        BuildSettings {
            default_scalar_style: options.default_scalar_style,
            default_flow_style: options.default_flow_style,
            dereference_aliases: options.dereference_aliases,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings::from(&DumpOptions::default())
    }
}

pub struct GraphBuilder {
    settings: BuildSettings,
    rules: HashMap<ValueKind, Box<dyn Represent>>,
    object_rules: HashMap<String, Box<dyn Represent>>,
    default_rule: Option<Box<dyn Represent>>,
}

impl GraphBuilder {
    /// A builder with rules for every [`Value`] shape.
    pub fn new(options: &DumpOptions) -> Self {
        let mut builder = GraphBuilder::empty(options);
        rules::install(&mut builder);
        builder
    }

    /// A builder without any rule. Every value is a [`BuildError::NoRule`]
    /// until rules are registered.
    pub fn empty(options: &DumpOptions) -> Self {
        GraphBuilder {
            settings: BuildSettings::from(options),
            rules: HashMap::new(),
            object_rules: HashMap::new(),
            default_rule: None,
        }
    }

    pub fn settings(&self) -> BuildSettings {
        self.settings
    }

    /// Register (or replace) the rule for a value shape.
    pub fn with_rule(mut self, kind: ValueKind, rule: impl Represent + 'static) -> Self {
        self.set_rule(kind, rule);
        self
    }

    pub fn set_rule(&mut self, kind: ValueKind, rule: impl Represent + 'static) {
        self.rules.insert(kind, Box::new(rule));
    }

    /// Register the rule for named objects of one type. It takes precedence
    /// over the generic object rule.
    pub fn with_object_rule(
        mut self,
        type_name: impl Into<String>,
        rule: impl Represent + 'static,
    ) -> Self {
        self.object_rules.insert(type_name.into(), Box::new(rule));
        self
    }

    /// Rule used when nothing more specific matches.
    pub fn with_default_rule(mut self, rule: impl Represent + 'static) -> Self {
        self.default_rule = Some(Box::new(rule));
        self
    }

    /// Build the tree of one document.
    ///
    /// The identity map lives only for this call.
    pub fn build(&self, value: &Value) -> Result<Tree, BuildError> {
        let mut cx = BuildContext::new(self);
        let root = cx.represent(value)?;
        let mut tree = cx.tree;
        tree.set_root(root);
        Ok(tree)
    }

    fn rule_for(&self, value: &Value) -> Option<&dyn Represent> {
        let by_type = match value {
            Value::Object(object) => self.object_rules.get(&object.borrow().type_name),
            _ => None,
        };
        by_type
            .or_else(|| self.rules.get(&value.kind()))
            .or(self.default_rule.as_ref())
            .map(|rule| rule.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress(NodeId),
    Done(NodeId),
}

/// State of one [`GraphBuilder::build`] call.
pub struct BuildContext<'a> {
    builder: &'a GraphBuilder,
    tree: Tree,
    visits: HashMap<usize, Visit>,
    path: Vec<String>,
}

impl<'a> BuildContext<'a> {
    fn new(builder: &'a GraphBuilder) -> Self {
        BuildContext {
            builder,
            tree: Tree::new(),
            visits: HashMap::new(),
            path: Vec::new(),
        }
    }

    pub fn settings(&self) -> BuildSettings {
        self.builder.settings
    }

    /// Location of the value being represented, e.g. `$.servers[2].port`.
    pub fn path(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.path {
            path.push_str(segment);
        }
        path
    }

    /// A [`BuildError::Invalid`] at the current path.
    pub fn invalid(&self, message: impl Into<String>) -> BuildError {
        BuildError::Invalid {
            path: self.path(),
            message: message.into(),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.tree.node_mut(id)
    }

    /// Represent a value, honouring instance identity.
    pub fn represent(&mut self, value: &Value) -> Result<NodeId, BuildError> {
        if let Some(identity) = value.identity() {
            match self.visits.get(&identity).copied() {
                Some(Visit::InProgress(_)) if self.builder.settings.dereference_aliases => {
                    return Err(BuildError::Cycle { path: self.path() });
                }
                Some(Visit::InProgress(id)) | Some(Visit::Done(id))
                    if !self.builder.settings.dereference_aliases =>
                {
                    debug!("value at {} is shared, reusing node {}", self.path(), id.index());
                    self.tree.node_mut(id).shared = true;
                    return Ok(id);
                }
                _ => {}
            }
        }

        let builder = self.builder;
        let rule = builder.rule_for(value).ok_or_else(|| BuildError::NoRule {
            kind: match value {
                Value::Object(object) => object.borrow().type_name.clone(),
                other => other.kind().name().to_string(),
            },
            path: self.path(),
        })?;
        let id = rule.represent(value, self)?;
        if let Some(identity) = value.identity() {
            self.visits.insert(identity, Visit::Done(id));
        }
        Ok(id)
    }

    /// Add a scalar node, applying the default scalar style when `style` is unset.
    pub fn scalar(
        &mut self,
        tag: Tag,
        value: impl Into<String>,
        style: Option<ScalarStyle>,
    ) -> NodeId {
        let style = style.or(match self.builder.settings.default_scalar_style {
            ScalarStyle::Plain => None,
            other => Some(other),
        });
        self.tree.add(Node::scalar(tag, value, style))
    }

    /// Add a string scalar. Multi-line strings default to literal style.
    pub fn string(&mut self, value: &str) -> NodeId {
        let style = match self.builder.settings.default_scalar_style {
            ScalarStyle::Plain if value.contains('\n') => Some(ScalarStyle::Literal),
            _ => None,
        };
        self.scalar(Tag::STR, value, style)
    }

    /// Add a sequence node for `owner` and represent its items.
    ///
    /// A `flow_style` other than [`FlowStyle::Auto`] is kept as given;
    /// `Auto` defers to the configured default and flow inference.
    pub fn sequence(
        &mut self,
        owner: &Value,
        tag: Tag,
        items: &[Value],
        flow_style: FlowStyle,
    ) -> Result<NodeId, BuildError> {
        let id = self.begin(owner, Node::sequence(tag, Vec::new(), FlowStyle::Auto));
        let mut best_flow = true;
        for (index, item) in items.iter().enumerate() {
            self.path.push(format!("[{}]", index));
            let child = self.represent(item)?;
            self.path.pop();
            best_flow &= self.tree.node(child).is_plain_scalar();
            self.tree.push_item(id, child);
        }
        self.finish(id, flow_style, best_flow);
        Ok(id)
    }

    /// Add a mapping node for `owner` and represent its entries in order.
    pub fn mapping(
        &mut self,
        owner: &Value,
        tag: Tag,
        entries: &[(Value, Value)],
        flow_style: FlowStyle,
    ) -> Result<NodeId, BuildError> {
        let id = self.begin(owner, Node::mapping(tag, Vec::new(), FlowStyle::Auto));
        let mut best_flow = true;
        for (key, value) in entries {
            self.path.push(key_segment(key));
            let key_id = self.represent(key)?;
            let value_id = self.represent(value)?;
            self.path.pop();
            best_flow &= self.tree.node(key_id).is_plain_scalar();
            best_flow &= self.tree.node(value_id).is_plain_scalar();
            self.tree.push_entry(id, key_id, value_id);
        }
        self.finish(id, flow_style, best_flow);
        Ok(id)
    }

    /// Add a mapping node for a named object, one string key per field.
    pub fn fields(
        &mut self,
        owner: &Value,
        tag: Tag,
        fields: &[(String, Value)],
        flow_style: FlowStyle,
    ) -> Result<NodeId, BuildError> {
        let id = self.begin(owner, Node::mapping(tag, Vec::new(), FlowStyle::Auto));
        let mut best_flow = true;
        for (name, value) in fields {
            self.path.push(format!(".{}", name));
            let key_id = self.string(name);
            let value_id = self.represent(value)?;
            self.path.pop();
            best_flow &= self.tree.node(key_id).is_plain_scalar();
            best_flow &= self.tree.node(value_id).is_plain_scalar();
            self.tree.push_entry(id, key_id, value_id);
        }
        self.finish(id, flow_style, best_flow);
        Ok(id)
    }

    fn begin(&mut self, owner: &Value, node: Node) -> NodeId {
        let id = self.tree.add(node);
        if let Some(identity) = owner.identity() {
            self.visits.insert(identity, Visit::InProgress(id));
        }
        id
    }

    fn finish(&mut self, id: NodeId, requested: FlowStyle, best_flow: bool) {
        if requested != FlowStyle::Auto {
            self.tree.node_mut(id).set_flow_style(requested);
            return;
        }
        let style = match self.builder.settings.default_flow_style {
            FlowStyle::Auto if best_flow => FlowStyle::Flow,
            FlowStyle::Auto => FlowStyle::Block,
            other => other,
        };
        self.tree.node_mut(id).set_flow_style(style);
    }
}

fn key_segment(key: &Value) -> String {
    match key {
        Value::Str(s) => format!(".{}", s),
        Value::Int(i) => format!("[{}]", i),
        Value::Bool(b) => format!("[{}]", b),
        Value::Null => "[null]".to_string(),
        _ => format!("[<{}>]", key.kind().name()),
    }
}
