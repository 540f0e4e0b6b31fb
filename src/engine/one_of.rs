use serde_json::Value;

use crate::domain::{FieldKind, FieldShape, RecordShape};
use crate::form::{
    ComboBox, ComboItem, ConfigError, Control, Form, FormArea, SaveAction, Stack, json_type,
    location, shared,
};
use crate::format::format_label;

use super::context::{FieldContext, RenderContext};
use super::dispatch::render_field;

struct Alternative {
    key: String,
    inner: FieldKind,
    save: SaveAction,
}

/// Renders a OneOf record: a picker over the alternatives above a stack with
/// one page per alternative.
///
/// Every absent alternative is allocated (without init hooks) so its page can
/// be shown. Saving commits only the selected page, records its key in the
/// discriminator and clears every other alternative.
pub(crate) fn render_one_of(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    shape: &RecordShape,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let mut exported = shape.fields().iter().filter(|field| field.is_exported());
    let Some(discriminator) = exported.next() else {
        return Err(ConfigError::EmptyOneOf {
            pointer: cx.pointer().to_string(),
        });
    };
    let alternatives: Vec<&FieldShape> = exported.collect();
    if alternatives.is_empty() {
        return Err(ConfigError::EmptyOneOf {
            pointer: cx.pointer().to_string(),
        });
    }
    for alternative in &alternatives {
        if !alternative.kind().is_optional() {
            return Err(ConfigError::OneOfAlternative {
                pointer: cx.child(alternative.key())?.pointer().to_string(),
                field: alternative.key().to_string(),
                kind: alternative.kind().describe(),
            });
        }
    }

    let found = json_type(value);
    let Some(members) = value.as_object_mut() else {
        return Err(ConfigError::ShapeMismatch {
            pointer: cx.pointer().to_string(),
            expected: format!("record {}", shape.type_name()),
            found: found.to_string(),
        });
    };

    let selected = members
        .get(discriminator.key())
        .and_then(Value::as_str)
        .unwrap_or_default();
    let initial = alternatives
        .iter()
        .position(|alternative| alternative.key() == selected)
        .unwrap_or(0);

    let items = alternatives
        .iter()
        .map(|alternative| {
            ComboItem::new(alternative_label(alternative))
                .with_icon(alternative.annotations().icon_hint().map(str::to_string))
        })
        .collect();
    let mut picker = ComboBox::new(items);
    picker.set_current(Some(initial));
    let picker = shared(picker);
    form.append_full_width_row(Control::ComboBox(picker.clone()));

    let mut pages = Vec::with_capacity(alternatives.len());
    let mut rendered = Vec::with_capacity(alternatives.len());
    for alternative in &alternatives {
        let FieldKind::Optional(inner) = alternative.kind() else {
            continue;
        };
        let child = cx.child(alternative.key())?;
        let slot = members
            .entry(alternative.key().to_string())
            .or_insert(Value::Null);
        if slot.is_null() {
            *slot = inner
                .zero_value()
                .map_err(|err| ConfigError::serde(child.pointer(), err))?;
        }

        let label = alternative_label(alternative);
        let mut page = Form::new();
        let save = render_field(
            &child,
            &mut page,
            &FieldContext {
                kind: inner,
                annotations: alternative.annotations(),
                label: &label,
                pointer: child.pointer(),
            },
            slot,
        )?;
        pages.push(page);
        rendered.push(Alternative {
            key: alternative.key().to_string(),
            inner: (**inner).clone(),
            save,
        });
    }
    form.append_full_width_row(Control::Stack(Stack::new(pages, picker.clone())));

    let discriminator_key = discriminator.key().to_string();
    let pointer = cx.pointer().to_string();
    Ok(SaveAction::new(move |record| {
        let Some(index) = picker.borrow().current() else {
            return Ok(());
        };
        let found = json_type(record);
        let members = record
            .as_object_mut()
            .ok_or_else(|| ConfigError::ShapeMismatch {
                pointer: pointer.clone(),
                expected: "record".to_string(),
                found: found.to_string(),
            })?;

        let Some(active) = rendered.get_mut(index) else {
            return Ok(());
        };
        let slot = members.entry(active.key.clone()).or_insert(Value::Null);
        if slot.is_null() {
            *slot = active
                .inner
                .zero_value()
                .map_err(|err| ConfigError::serde(format!("{pointer}/{}", active.key), err))?;
        }
        active.save.run(slot)?;
        let active_key = active.key.clone();

        members.insert(discriminator_key.clone(), Value::String(active_key.clone()));
        for alternative in &rendered {
            if alternative.key != active_key {
                members.insert(alternative.key.clone(), Value::Null);
            }
        }
        log::trace!("OneOf at {} committed `{active_key}`", location(&pointer));
        Ok(())
    }))
}

fn alternative_label(field: &FieldShape) -> String {
    field
        .annotations()
        .explicit_label()
        .map(str::to_string)
        .unwrap_or_else(|| format_label(field.key()))
}
