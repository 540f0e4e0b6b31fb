use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::form::{Button, ConfigError, Control, Form, Shared};

use super::dialog::{DialogHost, DialogSession, Outcome};

/// One dialog's worth of scripted interaction.
pub type Script = Box<dyn FnOnce(&mut DialogDriver<'_, '_>) -> Result<(), ScriptError>>;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("dialog '{title}' opened with no script left to drive it")]
    NoScript { title: String },

    #[error("no row labelled '{label}'")]
    MissingRow { label: String },

    #[error("row '{label}' has no {expected}")]
    WrongControl { label: String, expected: &'static str },

    #[error("button '{caption}' in row '{label}' is disabled")]
    Disabled { label: String, caption: String },

    #[error(transparent)]
    Action(#[from] anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Headless host that plays back one script per opened dialog, in the order
/// the dialogs open.
///
/// A script that returns without closing its dialog leaves it to be closed as
/// cancelled. Picker answers are queued up front; an empty queue answers as a
/// cancelled picker.
#[derive(Default)]
pub struct ScriptedHost {
    scripts: VecDeque<Script>,
    file_picks: VecDeque<Option<PathBuf>>,
    directory_picks: VecDeque<Option<PathBuf>>,
    theme_icons: HashSet<String>,
    opened: Vec<String>,
    picker_requests: Vec<(PathBuf, String)>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(
        mut self,
        script: impl FnOnce(&mut DialogDriver<'_, '_>) -> Result<(), ScriptError> + 'static,
    ) -> Self {
        self.scripts.push_back(Box::new(script));
        self
    }

    pub fn with_file_pick(mut self, pick: Option<PathBuf>) -> Self {
        self.file_picks.push_back(pick);
        self
    }

    pub fn with_directory_pick(mut self, pick: Option<PathBuf>) -> Self {
        self.directory_picks.push_back(pick);
        self
    }

    pub fn with_theme_icons<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.theme_icons.extend(names.into_iter().map(Into::into));
        self
    }

    /// Titles of every dialog shown so far, outermost first.
    pub fn opened_titles(&self) -> &[String] {
        &self.opened
    }

    /// Start directory and filter of every picker request; directory pickers
    /// report an empty filter.
    pub fn picker_requests(&self) -> &[(PathBuf, String)] {
        &self.picker_requests
    }

    pub fn remaining_scripts(&self) -> usize {
        self.scripts.len()
    }
}

impl DialogHost for ScriptedHost {
    fn exec(&mut self, session: &mut DialogSession<'_>) -> anyhow::Result<()> {
        self.opened.push(session.title().to_string());
        let Some(script) = self.scripts.pop_front() else {
            return Err(ScriptError::NoScript {
                title: session.title().to_string(),
            }
            .into());
        };
        log::debug!("scripting dialog '{}'", session.title());
        let mut driver = DialogDriver {
            session,
            host: self,
        };
        script(&mut driver)?;
        Ok(())
    }

    fn pick_existing_file(&mut self, start_dir: &Path, filter: &str) -> Option<PathBuf> {
        self.picker_requests
            .push((start_dir.to_path_buf(), filter.to_string()));
        self.file_picks.pop_front().flatten()
    }

    fn pick_existing_directory(&mut self, start_dir: &Path) -> Option<PathBuf> {
        self.picker_requests
            .push((start_dir.to_path_buf(), String::new()));
        self.directory_picks.pop_front().flatten()
    }

    fn has_theme_icon(&self, name: &str) -> bool {
        self.theme_icons.contains(name)
    }
}

/// Finds controls by row label and operates them like a user would.
///
/// A row matches on its label, or for checkboxes on the checkbox text. Rows on
/// the active page of a OneOf stack are searched as well.
pub struct DialogDriver<'a, 'v> {
    session: &'a mut DialogSession<'v>,
    host: &'a mut ScriptedHost,
}

impl DialogDriver<'_, '_> {
    pub fn title(&self) -> &str {
        self.session.title()
    }

    pub fn value(&self) -> &Value {
        self.session.value()
    }

    pub fn form(&self) -> &Form {
        self.session.form()
    }

    /// Labels of the visible rows, in order. Checkbox rows report their text.
    pub fn row_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        collect_labels(self.session.form(), &mut labels);
        labels
    }

    pub fn set_checked(&mut self, label: &str, checked: bool) -> Result<(), ScriptError> {
        let check = self.pick(label, "checkbox", |control| match control {
            Control::CheckBox(check) => Some(check.clone()),
            _ => None,
        })?;
        check.borrow_mut().checked = checked;
        Ok(())
    }

    pub fn set_text(&mut self, label: &str, text: &str) -> Result<(), ScriptError> {
        let control = self.pick(label, "text input", |control| match control {
            Control::LineEdit(_) | Control::TextEdit(_) => Some(control.clone()),
            _ => None,
        })?;
        match control {
            Control::LineEdit(line) => line.borrow_mut().text = text.to_string(),
            Control::TextEdit(area) => area.borrow_mut().text = text.to_string(),
            _ => {}
        }
        Ok(())
    }

    /// Raw text of the row's input, or of its label when it is read-only.
    pub fn text(&self, label: &str) -> Result<String, ScriptError> {
        self.pick(label, "text", |control| match control {
            Control::LineEdit(line) => Some(line.borrow().text.clone()),
            Control::TextEdit(area) => Some(area.borrow().text.clone()),
            Control::Label(text) => Some(text.borrow().text.clone()),
            _ => None,
        })
    }

    /// Returns the value the spinner kept after clamping.
    pub fn set_int(&mut self, label: &str, value: i64) -> Result<i64, ScriptError> {
        let spin = self.spin(label)?;
        let stored = spin.borrow_mut().set_value(value);
        Ok(stored)
    }

    pub fn int(&self, label: &str) -> Result<i64, ScriptError> {
        Ok(self.spin(label)?.borrow().value())
    }

    pub fn spin_bounds(&self, label: &str) -> Result<(i64, i64), ScriptError> {
        Ok(self.spin(label)?.borrow().range())
    }

    pub fn set_float(&mut self, label: &str, value: f64) -> Result<f64, ScriptError> {
        let spin = self.pick(label, "decimal spinner", |control| match control {
            Control::DoubleSpinBox(spin) => Some(spin.clone()),
            _ => None,
        })?;
        let stored = spin.borrow_mut().set_value(value);
        Ok(stored)
    }

    pub fn select(&mut self, label: &str, index: usize) -> Result<(), ScriptError> {
        let combo = self.pick(label, "drop-down", |control| match control {
            Control::ComboBox(combo) => Some(combo.clone()),
            _ => None,
        })?;
        combo.borrow_mut().set_current(Some(index));
        Ok(())
    }

    pub fn selected(&self, label: &str) -> Result<Option<usize>, ScriptError> {
        let combo = self.pick(label, "drop-down", |control| match control {
            Control::ComboBox(combo) => Some(combo.clone()),
            _ => None,
        })?;
        let current = combo.borrow().current();
        Ok(current)
    }

    /// Picks `item` in the first drop-down offering it, labelled or not. This
    /// is how the unlabelled OneOf picker is driven.
    pub fn choose(&mut self, item: &str) -> Result<(), ScriptError> {
        let mut found = None;
        self.session.form().walk(&mut |control| {
            if found.is_some() {
                return;
            }
            if let Control::ComboBox(combo) = control {
                let position = combo.borrow().items().iter().position(|entry| entry.text == item);
                if let Some(index) = position {
                    found = Some((combo.clone(), index));
                }
            }
        });
        let (combo, index) = found.ok_or_else(|| ScriptError::MissingRow {
            label: item.to_string(),
        })?;
        combo.borrow_mut().set_current(Some(index));
        Ok(())
    }

    pub fn set_datetime(&mut self, label: &str, value: DateTime<Utc>) -> Result<(), ScriptError> {
        let edit = self.pick(label, "date-time input", |control| match control {
            Control::DateTimeEdit(edit) => Some(edit.clone()),
            _ => None,
        })?;
        edit.borrow_mut().set_value(value);
        Ok(())
    }

    pub fn datetime(&self, label: &str) -> Result<DateTime<Utc>, ScriptError> {
        self.pick(label, "date-time input", |control| match control {
            Control::DateTimeEdit(edit) => Some(edit.borrow().value()),
            _ => None,
        })
    }

    /// Clicks the button captioned `caption` in the row. Nested dialogs the
    /// click opens are driven by the following scripts before this returns.
    pub fn click(&mut self, label: &str, caption: &str) -> Result<(), ScriptError> {
        let button = self.button(label, caption)?;
        if !button.is_enabled() {
            return Err(ScriptError::Disabled {
                label: label.to_string(),
                caption: caption.to_string(),
            });
        }
        self.session.click(&button, &mut *self.host)?;
        Ok(())
    }

    pub fn button_enabled(&self, label: &str, caption: &str) -> Result<bool, ScriptError> {
        Ok(self.button(label, caption)?.is_enabled())
    }

    /// Replaces the list selection with `indices`.
    pub fn list_select(&mut self, label: &str, indices: &[usize]) -> Result<(), ScriptError> {
        let (view, _) = self.list(label)?;
        let mut view = view.borrow_mut();
        view.clear_selection();
        for index in indices {
            view.toggle(*index);
        }
        Ok(())
    }

    pub fn list_items(&self, label: &str) -> Result<Vec<String>, ScriptError> {
        let (view, _) = self.list(label)?;
        let items = view.borrow().items().to_vec();
        Ok(items)
    }

    /// Double-click on the row at `index`.
    pub fn list_activate(&mut self, label: &str, index: usize) -> Result<(), ScriptError> {
        let (view, activate) = self.list(label)?;
        view.borrow_mut().set_cursor(Some(index));
        let activate = activate.ok_or(ScriptError::WrongControl {
            label: label.to_string(),
            expected: "activation handler",
        })?;
        self.session.click(&activate, &mut *self.host)?;
        Ok(())
    }

    /// Text of the row's status label, e.g. an optional field's summary.
    pub fn status(&self, label: &str) -> Result<String, ScriptError> {
        self.pick(label, "status label", |control| match control {
            Control::Label(text) => Some(text.borrow().text.clone()),
            _ => None,
        })
    }

    /// Whether the row shows its value without a way to change it.
    pub fn is_read_only(&self, label: &str) -> Result<bool, ScriptError> {
        let control = self.row(label)?;
        Ok(matches!(control, Control::Label(_)))
    }

    pub fn accept(&mut self) -> Result<Outcome, ScriptError> {
        Ok(self.session.close(true)?)
    }

    pub fn reject(&mut self) -> Result<Outcome, ScriptError> {
        Ok(self.session.close(false)?)
    }

    fn row(&self, label: &str) -> Result<Control, ScriptError> {
        find_row(self.session.form(), label).ok_or_else(|| ScriptError::MissingRow {
            label: label.to_string(),
        })
    }

    fn pick<T>(
        &self,
        label: &str,
        expected: &'static str,
        mut matcher: impl FnMut(&Control) -> Option<T>,
    ) -> Result<T, ScriptError> {
        let row = self.row(label)?;
        let mut found = None;
        row.walk(&mut |control| {
            if found.is_none() {
                found = matcher(control);
            }
        });
        found.ok_or(ScriptError::WrongControl {
            label: label.to_string(),
            expected,
        })
    }

    fn spin(&self, label: &str) -> Result<Shared<crate::form::SpinBox>, ScriptError> {
        self.pick(label, "spinner", |control| match control {
            Control::SpinBox(spin) => Some(spin.clone()),
            _ => None,
        })
    }

    fn button(&self, label: &str, caption: &str) -> Result<Button, ScriptError> {
        self.pick(label, "button", |control| match control {
            Control::Button(button) if button.icon().caption() == caption => Some(button.clone()),
            _ => None,
        })
        .map_err(|_| ScriptError::WrongControl {
            label: label.to_string(),
            expected: "button with that caption",
        })
    }

    fn list(&self, label: &str) -> Result<(Shared<crate::form::ListView>, Option<Button>), ScriptError> {
        self.pick(label, "list", |control| match control {
            Control::ListView { view, on_activate } => Some((view.clone(), on_activate.clone())),
            _ => None,
        })
    }
}

fn row_matches(label: Option<&str>, control: &Control, wanted: &str) -> bool {
    if label == Some(wanted) {
        return true;
    }
    match control {
        Control::CheckBox(check) => check.borrow().text == wanted,
        _ => false,
    }
}

fn find_row(form: &Form, wanted: &str) -> Option<Control> {
    for row in form.rows() {
        if row_matches(row.label.as_deref(), &row.control, wanted) {
            return Some(row.control.clone());
        }
        if let Control::Stack(stack) = &row.control {
            if let Some(found) = stack.active_page().and_then(|page| find_row(page, wanted)) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_labels(form: &Form, labels: &mut Vec<String>) {
    for row in form.rows() {
        match (&row.control, row.label.as_deref()) {
            (Control::CheckBox(check), Some("") | None) => labels.push(check.borrow().text.clone()),
            (Control::Stack(stack), _) => {
                if let Some(page) = stack.active_page() {
                    collect_labels(page, labels);
                }
            }
            (_, Some(label)) => labels.push(label.to_string()),
            (_, None) => {}
        }
    }
}
