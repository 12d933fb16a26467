//! Application values handed to the graph builder.
//!
//! Composite values are reference counted so that one instance can be
//! reachable along several paths, including through itself. Identity (not
//! equality) of those instances is what the builder turns into anchors.

use std::cell::RefCell;
use std::rc::Rc;

pub type Shared<T> = Rc<RefCell<T>>;

/// A named application object: a type name and ordered fields.
#[derive(Debug, Clone)]
pub struct Object {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Binary(Vec<u8>),
    Seq(Shared<Vec<Value>>),
    Map(Shared<Vec<(Value, Value)>>),
    Object(Shared<Object>),
}

/// The shape of a value, used to look up conversion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Binary,
    Seq,
    Map,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Binary => "binary",
            ValueKind::Seq => "seq",
            ValueKind::Map => "map",
            ValueKind::Object => "object",
        }
    }
}

impl Value {
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn object(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(Object {
            type_name: type_name.into(),
            fields,
        })))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Binary(_) => ValueKind::Binary,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Instance identity of a composite value. Scalars have none.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(Rc::as_ptr(items) as *const u8 as usize),
            Value::Map(entries) => Some(Rc::as_ptr(entries) as *const u8 as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const u8 as usize),
            _ => None,
        }
    }

    /// Another handle to the same instance (scalars are copied).
    pub fn share(&self) -> Value {
        self.clone()
    }

    /// Append to a sequence value. Ignored for other kinds.
    pub fn push(&self, item: Value) {
        if let Value::Seq(items) = self {
            items.borrow_mut().push(item);
        }
    }

    /// Append to a mapping value. Ignored for other kinds.
    pub fn insert(&self, key: Value, value: Value) {
        if let Value::Map(entries) = self {
            entries.borrow_mut().push((key, value));
        }
    }
}

/// Text of a float the way the core schema reads it back.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            ".inf".to_string()
        } else {
            "-.inf".to_string()
        }
    } else {
        format!("{:?}", value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}
