use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::domain::{AddressPort, FieldKind, FloatWidth, IntWidth};
use crate::form::icon::{BROWSE_DIRECTORY, BROWSE_FILE};
use crate::form::{
    Button, CheckBox, ComboBox, ComboItem, ConfigError, Control, DateTimeEdit, DoubleSpinBox,
    FormArea, Label, LineEdit, SaveAction, SpinBox, TextEdit, location, shared,
};

use super::context::{FieldContext, RenderContext};

pub(crate) fn render_bool(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let checked = value
        .as_bool()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "boolean", value))?;
    let check = shared(CheckBox {
        text: field.label.to_string(),
        checked,
    });
    form.append_row("", Control::CheckBox(check.clone()));

    Ok(SaveAction::new(move |slot| {
        *slot = Value::Bool(check.borrow().checked);
        Ok(())
    }))
}

/// Single-line text, masked for passwords. Also used for a `OneOf`
/// discriminator that is not the first field of its record.
pub(crate) fn render_text(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let text = seeded_text(cx, field, value)?;
    let line = shared(if matches!(field.kind, FieldKind::Password) {
        LineEdit::password(text)
    } else {
        LineEdit::new(text)
    });
    form.append_row(field.label, Control::LineEdit(line.clone()));

    Ok(SaveAction::new(move |slot| {
        *slot = Value::String(line.borrow().text.clone());
        Ok(())
    }))
}

pub(crate) fn render_multi_line(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let text = seeded_text(cx, field, value)?;
    let area = shared(TextEdit { text });
    form.append_row(field.label, Control::TextEdit(area.clone()));

    Ok(SaveAction::new(move |slot| {
        *slot = Value::String(area.borrow().text.clone());
        Ok(())
    }))
}

// The `Init` annotation only seeds controls whose value is still empty.
fn seeded_text(
    cx: &RenderContext,
    field: &FieldContext<'_>,
    value: &Value,
) -> Result<String, ConfigError> {
    let current = value
        .as_str()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "string", value))?;
    Ok(match field.annotations.initial_text() {
        Some(init) if current.is_empty() => init.to_string(),
        _ => current.to_string(),
    })
}

/// Spin box range for an integer width.
///
/// 8, 16 and 32-bit types get their exact range. The spin box holds an `i64`,
/// so `u64` and `usize` fields are limited to `0..=i64::MAX`; larger values
/// need a custom renderer.
pub fn spin_range(width: IntWidth) -> (i64, i64) {
    let (min, max) = width.type_range();
    let min = min.max(i64::MIN as i128) as i64;
    let max = max.min(i64::MAX as i128) as i64;
    (min, max)
}

/// Finite bounds of a float field; an `f32` must not save as infinity.
pub fn float_range(width: FloatWidth) -> (f64, f64) {
    match width {
        FloatWidth::F32 => (f32::MIN as f64, f32::MAX as f64),
        FloatWidth::F64 => (f64::MIN, f64::MAX),
    }
}

pub(crate) fn render_integer(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let FieldKind::Integer(width) = field.kind else {
        return Err(ConfigError::unhandled(cx.pointer(), field.kind.describe()));
    };
    let (min, max) = spin_range(*width);

    let stored: i128 = match &*value {
        Value::Number(number) => match (number.as_i64(), number.as_u64()) {
            (Some(signed), _) => signed as i128,
            (None, Some(unsigned)) => unsigned as i128,
            (None, None) => {
                return Err(ConfigError::shape_mismatch(cx.pointer(), "integer", value));
            }
        },
        other => return Err(ConfigError::shape_mismatch(cx.pointer(), "integer", other)),
    };

    if stored < min as i128 || stored > max as i128 {
        log::warn!(
            "{}: {stored} is outside the editable range {min}..={max}, showing it read-only",
            location(cx.pointer())
        );
        form.append_row(field.label, Control::Label(shared(Label::new(stored.to_string()))));
        return Ok(SaveAction::noop());
    }

    let mut spin = SpinBox::new(min, max);
    spin.set_value(stored as i64);
    let spin = shared(spin);
    form.append_row(field.label, Control::SpinBox(spin.clone()));

    let signed = width.is_signed();
    Ok(SaveAction::new(move |slot| {
        let current = spin.borrow().value();
        *slot = if signed {
            Value::from(current)
        } else {
            Value::from(current.max(0) as u64)
        };
        Ok(())
    }))
}

pub(crate) fn render_float(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let current = value
        .as_f64()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "number", value))?;

    let FieldKind::Float(width) = field.kind else {
        return Err(ConfigError::unhandled(cx.pointer(), field.kind.describe()));
    };
    let (min, max) = float_range(*width);

    // Range first; setting the value against the default range would clamp it.
    let mut spin = DoubleSpinBox::new(min, max);
    spin.set_value(current);
    let spin = shared(spin);
    form.append_row(field.label, Control::DoubleSpinBox(spin.clone()));

    Ok(SaveAction::new(move |slot| {
        if let Some(number) = Number::from_f64(spin.borrow().value()) {
            *slot = Value::Number(number);
        }
        Ok(())
    }))
}

pub(crate) fn render_enum(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let index = value
        .as_u64()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "option index", value))?;
    let items = field
        .annotations
        .enum_options()
        .into_iter()
        .map(ComboItem::new)
        .collect();
    let mut combo = ComboBox::new(items);
    combo.set_current(usize::try_from(index).ok());
    if combo.current().is_none() {
        log::warn!(
            "{}: option index {index} has no matching option",
            location(cx.pointer())
        );
    }
    let combo = shared(combo);
    form.append_row(field.label, Control::ComboBox(combo.clone()));

    Ok(SaveAction::new(move |slot| {
        if let Some(current) = combo.borrow().current() {
            *slot = Value::from(current);
        }
        Ok(())
    }))
}

/// Path text plus a browse button that asks the host's native picker.
pub(crate) fn render_path(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let text = seeded_text(cx, field, value)?;
    let line = shared(LineEdit::new(text));

    let browse = if matches!(field.kind, FieldKind::ExistingDirectory) {
        let line = line.clone();
        Button::new(BROWSE_DIRECTORY, move |action| {
            let start = PathBuf::from(line.borrow().text.clone());
            if let Some(chosen) = action.host().pick_existing_directory(&start) {
                line.borrow_mut().text = chosen.display().to_string();
            }
            Ok(())
        })
    } else {
        let line = line.clone();
        let filter = field.annotations.file_filter().to_string();
        Button::new(BROWSE_FILE, move |action| {
            let start = start_directory(&line.borrow().text);
            if let Some(chosen) = action.host().pick_existing_file(&start, &filter) {
                line.borrow_mut().text = chosen.display().to_string();
            }
            Ok(())
        })
    };

    form.append_row(
        field.label,
        Control::Row(vec![Control::LineEdit(line.clone()), Control::Button(browse)]),
    );

    Ok(SaveAction::new(move |slot| {
        *slot = Value::String(line.borrow().text.clone());
        Ok(())
    }))
}

fn start_directory(current: &str) -> PathBuf {
    match Path::new(current).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(crate) fn render_address_port(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let pair: AddressPort = serde_json::from_value(value.clone())
        .map_err(|err| ConfigError::serde(cx.pointer(), err))?;

    let address = shared(LineEdit::new(pair.address.clone()));
    let mut port = SpinBox::new(0, u16::MAX as i64);
    let seed = match field.annotations.default_port() {
        Some(default) if pair.is_unset() => default,
        _ => pair.port,
    };
    port.set_value(seed as i64);
    let port = shared(port);

    form.append_row(
        field.label,
        Control::Row(vec![
            Control::LineEdit(address.clone()),
            Control::Label(shared(Label::new(":"))),
            Control::SpinBox(port.clone()),
        ]),
    );

    let pointer = cx.pointer().to_string();
    Ok(SaveAction::new(move |slot| {
        let replacement = AddressPort {
            address: address.borrow().text.clone(),
            port: u16::try_from(port.borrow().value()).unwrap_or(u16::MAX),
        };
        *slot = serde_json::to_value(replacement).map_err(|err| ConfigError::serde(pointer.clone(), err))?;
        Ok(())
    }))
}

/// Date-time picker at one-second resolution; sub-second precision is lost
/// on save.
pub(crate) fn render_timestamp(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "timestamp", value))?;
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(stamp) => stamp.with_timezone(&Utc),
        Err(err) => {
            log::warn!(
                "{}: cannot parse timestamp '{raw}' ({err}), showing it read-only",
                location(cx.pointer())
            );
            form.append_row(field.label, Control::Label(shared(Label::new(raw))));
            return Ok(SaveAction::noop());
        }
    };

    let picker = shared(DateTimeEdit::new(parsed));
    form.append_row(field.label, Control::DateTimeEdit(picker.clone()));

    Ok(SaveAction::new(move |slot| {
        let stamp = picker.borrow().value();
        *slot = Value::String(stamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        Ok(())
    }))
}

pub(crate) fn render_header(
    _cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    _value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    form.append_full_width_row(Control::Label(shared(Label::heading(field.label))));
    Ok(SaveAction::noop())
}

/// Fixed label with a best-effort summary, for shapes without an editor.
pub(crate) fn render_read_only(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let summary = cx.summarize(field.kind, field.annotations, value);
    form.append_row(field.label, Control::Label(shared(Label::new(summary))));
    Ok(SaveAction::noop())
}
