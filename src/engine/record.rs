use serde_json::Value;

use crate::domain::{FieldKind, RecordRef, RecordShape, UnsupportedKind};
use crate::form::{ConfigError, FormArea, SaveAction, json_type};
use crate::format::format_label;

use super::context::{FieldContext, RenderContext};
use super::dispatch::render_field;
use super::one_of::render_one_of;

/// Registry handler for a record held by value: its fields are rendered
/// inline in the enclosing form.
pub(crate) fn render_nested_record(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let Some(record) = field.kind.as_record() else {
        return Err(ConfigError::unhandled(cx.pointer(), field.kind.describe()));
    };
    render_record(cx, form, record, value)
}

/// Emits one row group per exported field, in declaration order, and returns
/// the composite save of those fields.
///
/// A record whose first field is a `OneOf` discriminator is handed to the
/// OneOf selector instead; none of its fields get ordinary rows.
pub fn render_record(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    record: &RecordRef,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let shape = record.shape();
    if shape.is_one_of() {
        return render_one_of(cx, form, &shape, value);
    }
    render_fields(cx, form, &shape, value)
}

fn render_fields(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    shape: &RecordShape,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let found = json_type(value);
    let Some(members) = value.as_object_mut() else {
        return Err(ConfigError::ShapeMismatch {
            pointer: cx.pointer().to_string(),
            expected: format!("record {}", shape.type_name()),
            found: found.to_string(),
        });
    };

    let mut saves = Vec::with_capacity(shape.fields().len());
    for field in shape.fields() {
        if !field.is_exported() {
            continue;
        }
        let child = cx.child(field.key())?;

        // Options skipped by `skip_serializing_if` are the only members
        // serde may leave out; any other gap means the key is misdeclared.
        if !members.contains_key(field.key()) && matches!(field.kind(), FieldKind::Optional(_)) {
            members.insert(field.key().to_string(), Value::Null);
        }
        let Some(slot) = members.get_mut(field.key()) else {
            return Err(ConfigError::missing(child.pointer()));
        };

        // An untyped payload with nothing in it has nothing to show.
        if matches!(field.kind(), FieldKind::Unsupported(UnsupportedKind::Dynamic)) && slot.is_null() {
            continue;
        }

        let label = field
            .annotations()
            .explicit_label()
            .map(str::to_string)
            .unwrap_or_else(|| format_label(field.key()));
        let field_cx = FieldContext {
            kind: field.kind(),
            annotations: field.annotations(),
            label: &label,
            pointer: child.pointer(),
        };
        let save = render_field(&child, form, &field_cx, slot)?;
        saves.push(SaveAction::scoped(field.key(), child.pointer(), save));
    }
    Ok(saves.into_iter().collect())
}
