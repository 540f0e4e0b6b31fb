use serde_json::Value;

use crate::domain::{Autoconfig, FieldKind};
use crate::form::{ConfigError, FormArea, SaveAction, location};

use super::context::{FieldContext, RenderContext};
use super::registry::KindKey;

/// Renderer stored in a [`crate::CustomRef`] for self-describing types.
pub type CustomRender = fn(
    &RenderContext,
    &mut dyn FormArea,
    &FieldContext<'_>,
    &mut Value,
) -> Result<SaveAction, ConfigError>;

/// Appends the rows for one field and returns its save action.
///
/// A self-describing type renders itself. Otherwise the registry handler for
/// the field's classification is used; a classification without a handler is
/// a configuration error.
pub fn render_field(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    log::debug!("render {} as {}", location(cx.pointer()), field.kind.describe());

    if let FieldKind::Custom(custom) = field.kind {
        if let Some(render) = custom.render() {
            return render(cx, form, field, value);
        }
    }

    let key = KindKey::of(field.kind);
    let handler = cx
        .registry()
        .handler(&key)
        .cloned()
        .ok_or_else(|| ConfigError::unhandled(cx.pointer(), field.kind.describe()))?;
    handler(cx, form, field, value)
}

/// Bridges an [`Autoconfig`] type to the untyped working copy: the value is
/// decoded for rendering, and decoded again at save time so the typed save
/// always sees the current state.
pub fn render_self_describing<T: Autoconfig>(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let pointer = cx.pointer().to_string();
    let mut typed: T = serde_json::from_value(value.clone())
        .map_err(|err| ConfigError::serde(pointer.clone(), err))?;
    let mut typed_save = typed.autoconfig(form, field)?;

    Ok(SaveAction::new(move |slot| {
        let mut current: T = serde_json::from_value(slot.clone())
            .map_err(|err| ConfigError::serde(pointer.clone(), err))?;
        typed_save(&mut current)?;
        *slot = serde_json::to_value(current).map_err(|err| ConfigError::serde(pointer.clone(), err))?;
        log::trace!("saved {}", location(&pointer));
        Ok(())
    }))
}

/// Renders a single value of `kind` as the whole body of its own dialog, as
/// done for optional payloads and list elements.
pub(crate) fn render_standalone(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    kind: &FieldKind,
    annotations: &crate::domain::Annotations,
    label: &str,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let field = FieldContext {
        kind,
        annotations,
        label,
        pointer: cx.pointer(),
    };
    render_field(cx, form, &field, value)
}
