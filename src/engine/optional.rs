use std::rc::Rc;

use serde_json::Value;

use crate::app::{ActionContext, open_dialog};
use crate::domain::{Annotations, FieldKind};
use crate::form::icon::{CLEAR, EDIT};
use crate::form::{
    Button, ConfigError, Control, FormArea, Label, SaveAction, Shared, location, shared,
};

use super::context::{Environment, FieldContext, RenderContext};
use super::dispatch::render_standalone;

/// Status label plus Edit and Clear buttons for an `Option<T>` field.
///
/// Both buttons change the bound value directly, so the field's own save is
/// empty.
pub(crate) fn render_optional(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let FieldKind::Optional(inner) = field.kind else {
        return Err(ConfigError::unhandled(cx.pointer(), field.kind.describe()));
    };

    let status = shared(Label::new(cx.summarize(field.kind, field.annotations, value)));
    let binding = Rc::new(OptionalBinding {
        env: Rc::clone(cx.env()),
        pointer: cx.pointer().to_string(),
        kind: field.kind.clone(),
        inner: (**inner).clone(),
        annotations: field.annotations.clone(),
        label: field.label.to_string(),
        status: status.clone(),
    });

    let edit = {
        let binding = Rc::clone(&binding);
        Button::new(EDIT, move |action| binding.edit(action))
    };
    let clear = {
        let binding = Rc::clone(&binding);
        Button::new(CLEAR, move |action| binding.clear(action))
    };

    form.append_row(
        field.label,
        Control::Row(vec![
            Control::Label(status),
            Control::Button(edit),
            Control::Button(clear),
        ]),
    );
    Ok(SaveAction::noop())
}

struct OptionalBinding {
    env: Rc<Environment>,
    pointer: String,
    kind: FieldKind,
    inner: FieldKind,
    annotations: Annotations,
    label: String,
    status: Shared<Label>,
}

impl OptionalBinding {
    fn refresh(&self, slot: &Value) {
        let summary = crate::format::summarize(
            &self.kind,
            &self.annotations,
            slot,
            self.env.options().summary_width,
        );
        self.status.borrow_mut().text = summary;
    }

    fn edit(&self, action: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let (root, host) = action.split();
        let slot = root
            .pointer_mut(&self.pointer)
            .ok_or_else(|| ConfigError::missing(self.pointer.clone()))?;

        if slot.is_null() {
            *slot = self
                .inner
                .allocate()
                .map_err(|err| ConfigError::serde(self.pointer.clone(), err))?;
            log::debug!("allocated {} for editing", location(&self.pointer));
        }
        self.refresh(slot);

        let result = open_dialog(&self.env, host, slot, &self.label, |cx, form, value| {
            render_standalone(cx, form, &self.inner, &self.annotations, &self.label, value)
        });
        self.refresh(slot);
        result.map(|_| ())
    }

    fn clear(&self, action: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let slot = action
            .root_mut()
            .pointer_mut(&self.pointer)
            .ok_or_else(|| ConfigError::missing(self.pointer.clone()))?;
        if !slot.is_null() {
            *slot = Value::Null;
        }
        self.refresh(slot);
        Ok(())
    }
}
