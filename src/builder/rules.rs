//! Standard rules, one per [`Value`] shape.

use super::{BuildContext, GraphBuilder};
use crate::error::BuildError;
use crate::model::{FlowStyle, NodeId, Tag};
use crate::value::{format_float, Value, ValueKind};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub(super) fn install(builder: &mut GraphBuilder) {
    builder.set_rule(ValueKind::Null, represent_null);
    builder.set_rule(ValueKind::Bool, represent_bool);
    builder.set_rule(ValueKind::Int, represent_int);
    builder.set_rule(ValueKind::Float, represent_float);
    builder.set_rule(ValueKind::Str, represent_str);
    builder.set_rule(ValueKind::Binary, represent_binary);
    builder.set_rule(ValueKind::Seq, represent_seq);
    builder.set_rule(ValueKind::Map, represent_map);
    builder.set_rule(ValueKind::Object, represent_object);
}

fn mismatch(cx: &BuildContext<'_>, expected: ValueKind, value: &Value) -> BuildError {
    cx.invalid(format!(
        "{} rule applied to a {} value",
        expected.name(),
        value.kind().name()
    ))
}

fn represent_null(_: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    Ok(cx.scalar(Tag::NULL, "null", None))
}

fn represent_bool(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Bool(b) => Ok(cx.scalar(Tag::BOOL, b.to_string(), None)),
        other => Err(mismatch(cx, ValueKind::Bool, other)),
    }
}

fn represent_int(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Int(i) => Ok(cx.scalar(Tag::INT, i.to_string(), None)),
        other => Err(mismatch(cx, ValueKind::Int, other)),
    }
}

fn represent_float(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Float(f) => Ok(cx.scalar(Tag::FLOAT, format_float(*f), None)),
        other => Err(mismatch(cx, ValueKind::Float, other)),
    }
}

fn represent_str(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Str(s) => Ok(cx.string(s)),
        other => Err(mismatch(cx, ValueKind::Str, other)),
    }
}

fn represent_binary(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Binary(bytes) => Ok(cx.scalar(Tag::BINARY, STANDARD.encode(bytes), None)),
        other => Err(mismatch(cx, ValueKind::Binary, other)),
    }
}

fn represent_seq(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Seq(items) => {
            let items = items.borrow();
            cx.sequence(value, Tag::SEQ, &items, FlowStyle::Auto)
        }
        other => Err(mismatch(cx, ValueKind::Seq, other)),
    }
}

fn represent_map(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Map(entries) => {
            let entries = entries.borrow();
            cx.mapping(value, Tag::MAP, &entries, FlowStyle::Auto)
        }
        other => Err(mismatch(cx, ValueKind::Map, other)),
    }
}

/// Named objects become mappings tagged with their type name.
fn represent_object(value: &Value, cx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
    match value {
        Value::Object(object) => {
            let object = object.borrow();
            cx.fields(value, Tag::local(&object.type_name), &object.fields, FlowStyle::Auto)
        }
        other => Err(mismatch(cx, ValueKind::Object, other)),
    }
}
