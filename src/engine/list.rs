use std::rc::Rc;

use serde_json::Value;

use crate::app::{ActionContext, Outcome, open_dialog};
use crate::domain::{Annotations, FieldKind};
use crate::form::icon::{LIST_ADD, LIST_EDIT, LIST_REMOVE};
use crate::form::{
    Button, ConfigError, Control, Enablement, FormArea, ListView, SaveAction, Shared, json_type,
    location, shared,
};

use super::context::{Environment, FieldContext, RenderContext};
use super::dispatch::render_standalone;

/// List view with Add, Edit and Remove buttons for a `Vec<T>` field.
///
/// Every button edits the bound array in place and refreshes the view, so the
/// field's own save is empty. Annotations of the list field apply to each
/// element's editor.
pub(crate) fn render_list(
    cx: &RenderContext,
    form: &mut dyn FormArea,
    field: &FieldContext<'_>,
    value: &mut Value,
) -> Result<SaveAction, ConfigError> {
    let FieldKind::List(element) = field.kind else {
        return Err(ConfigError::unhandled(cx.pointer(), field.kind.describe()));
    };
    let items = value
        .as_array()
        .ok_or_else(|| ConfigError::shape_mismatch(cx.pointer(), "array", value))?;

    let binding = Rc::new(ListBinding {
        env: Rc::clone(cx.env()),
        pointer: cx.pointer().to_string(),
        element: (**element).clone(),
        annotations: field.annotations.clone(),
        label: field.label.to_string(),
        view: shared(ListView::default()),
    });
    binding.refresh_from(items);

    let add = {
        let binding = Rc::clone(&binding);
        Button::new(LIST_ADD, move |action| binding.add(action))
    };
    let edit = {
        let enablement = Enablement::ExactlyOneSelected(binding.view.clone());
        let binding = Rc::clone(&binding);
        Button::new(LIST_EDIT, move |action| {
            let selected = binding.view.borrow().single_selection();
            match selected {
                Some(index) => binding.edit(action, index),
                None => Ok(()),
            }
        })
        .with_enablement(enablement)
    };
    let activate = {
        let binding = Rc::clone(&binding);
        Button::new(LIST_EDIT, move |action| {
            let cursor = binding.view.borrow().cursor();
            match cursor {
                Some(index) => binding.edit(action, index),
                None => Ok(()),
            }
        })
    };
    let remove = {
        let enablement = Enablement::AnySelected(binding.view.clone());
        let binding = Rc::clone(&binding);
        Button::new(LIST_REMOVE, move |action| binding.remove_selected(action))
            .with_enablement(enablement)
    };

    form.append_row(
        field.label,
        Control::Row(vec![
            Control::ListView {
                view: binding.view.clone(),
                on_activate: Some(activate),
            },
            Control::Button(add),
            Control::Button(edit),
            Control::Button(remove),
        ]),
    );
    Ok(SaveAction::noop())
}

struct ListBinding {
    env: Rc<Environment>,
    pointer: String,
    element: FieldKind,
    annotations: Annotations,
    label: String,
    view: Shared<ListView>,
}

impl ListBinding {
    fn refresh_from(&self, items: &[Value]) {
        let width = self.env.options().summary_width;
        let rows = items
            .iter()
            .map(|item| crate::format::summarize(&self.element, &self.annotations, item, width))
            .collect();
        self.view.borrow_mut().set_items(rows);
    }

    fn refresh(&self, action: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let items = self.items(action.root_mut())?;
        self.refresh_from(items);
        Ok(())
    }

    fn items<'v>(&self, root: &'v mut Value) -> Result<&'v mut Vec<Value>, ConfigError> {
        let slot = root
            .pointer_mut(&self.pointer)
            .ok_or_else(|| ConfigError::missing(self.pointer.clone()))?;
        let found = json_type(slot);
        slot.as_array_mut().ok_or_else(|| ConfigError::ShapeMismatch {
            pointer: self.pointer.clone(),
            expected: "array".to_string(),
            found: found.to_string(),
        })
    }

    /// Edits a fresh element in its own dialog and appends it on accept.
    fn add(&self, action: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let mut fresh = self
            .element
            .allocate()
            .map_err(|err| ConfigError::serde(self.pointer.clone(), err))?;

        let outcome = open_dialog(&self.env, action.host(), &mut fresh, &self.label, |cx, form, value| {
            render_standalone(cx, form, &self.element, &self.annotations, &self.label, value)
        })?;

        if outcome == Outcome::Accepted {
            self.items(action.root_mut())?.push(fresh);
            log::debug!("appended element to {}", location(&self.pointer));
        }
        self.refresh(action)
    }

    /// Edits the element at `index` in place.
    fn edit(&self, action: &mut ActionContext<'_>, index: usize) -> anyhow::Result<()> {
        let element_pointer = format!("{}/{index}", self.pointer);
        let (root, host) = action.split();
        let slot = root
            .pointer_mut(&element_pointer)
            .ok_or_else(|| ConfigError::missing(element_pointer.clone()))?;

        let result = open_dialog(&self.env, host, slot, &self.label, |cx, form, value| {
            render_standalone(cx, form, &self.element, &self.annotations, &self.label, value)
        });
        self.refresh(action)?;
        result.map(|_| ())
    }

    fn remove_selected(&self, action: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let selected: Vec<usize> = self.view.borrow().selection().iter().copied().collect();
        let items = self.items(action.root_mut())?;
        let removed = remove_indices(items, selected);
        log::debug!("removed {removed} element(s) from {}", location(&self.pointer));
        self.refresh(action)
    }
}

/// Removes the elements at `indices` and returns how many were removed.
///
/// Indices are removed highest first so earlier removals never shift the
/// ones still pending. Duplicates and out-of-range indices are ignored.
pub fn remove_indices<T>(items: &mut Vec<T>, indices: impl IntoIterator<Item = usize>) -> usize {
    let mut indices: Vec<usize> = indices.into_iter().collect();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();

    let mut removed = 0;
    for index in indices {
        if index < items.len() {
            items.remove(index);
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::remove_indices;

    #[test]
    fn removes_unordered_selection() {
        let mut items = vec!["a", "b", "c", "d", "e"];
        assert_eq!(remove_indices(&mut items, [2, 0, 3]), 3);
        assert_eq!(items, vec!["b", "e"]);
    }

    #[test]
    fn ignores_duplicates_and_out_of_range() {
        let mut items = vec![1, 2, 3];
        assert_eq!(remove_indices(&mut items, [1, 1, 9]), 1);
        assert_eq!(items, vec![1, 3]);
        assert_eq!(remove_indices(&mut items, []), 0);
    }
}
