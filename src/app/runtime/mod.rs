use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;

use crate::form::{Button, ComboBox, ConfigError, Control, DateTimeEdit, Form, Shared};
use crate::presentation::{PopupRender, PromptRender, RowView, SegmentView};

use super::dialog::{DialogHost, DialogSession};
use super::input::{KeyAction, TextInput, text_input};
use super::keymap::{KeymapContext, classify_key, help_text};
use super::options::EditorOptions;
use super::status::{Severity, StatusLine};
use super::terminal::Screen;

mod editing;
mod picker;

use editing::{NumberEntry, context_for, is_heading, parse_date_time, segment_lines};
use picker::PathPrompt;

/// Full-screen terminal dialogs on ratatui and crossterm.
///
/// Nested dialogs replace the screen of their parent and the header shows the
/// path of open dialogs. The terminal is taken over when the outermost dialog
/// opens and restored when it closes. Native pickers are replaced by a typed
/// path prompt.
pub struct TerminalHost {
    screen: Option<Screen>,
    tick_rate: Duration,
    show_help: bool,
    breadcrumb: Vec<String>,
    status: StatusLine,
    backdrop: Vec<RowView>,
    opened: usize,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new(&EditorOptions::default())
    }
}

impl TerminalHost {
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            screen: None,
            tick_rate: options.tick_rate,
            show_help: options.show_help,
            breadcrumb: Vec::new(),
            status: StatusLine::new(),
            backdrop: Vec::new(),
            opened: 0,
        }
    }

    fn run(&mut self, session: &mut DialogSession<'_>) -> Result<()> {
        let mut state = SessionState::default();
        self.status.ready();

        while session.is_open() {
            let layout = DialogLayout::of(session.form());
            state.sync_focus(&layout);

            let rows = layout.rows(&state);
            let help = self.help(state.context(&layout));
            let popup = state.popup();
            let prompt = state.prompt();
            self.render(&rows, help.as_deref(), session.is_cancelable(), popup, prompt)?;
            self.backdrop = rows;

            let tick = self.tick_rate;
            let Some(key) = self.screen()?.next_key(tick)? else {
                continue;
            };
            self.handle_key(session, &layout, &mut state, key)?;
        }
        Ok(())
    }

    fn handle_key(
        &mut self,
        session: &mut DialogSession<'_>,
        layout: &DialogLayout,
        state: &mut SessionState,
        key: KeyEvent,
    ) -> Result<()> {
        if state.overlay.is_some() {
            self.handle_overlay_key(state, key);
            return Ok(());
        }

        let focused = state.focused(layout).cloned();
        let context = focused
            .as_ref()
            .map(|item| context_for(&item.control))
            .unwrap_or(KeymapContext::Dialog);

        match classify_key(&key, context) {
            Some(KeyAction::Accept) => {
                self.commit_number(layout, state);
                close(session, true)?;
            }
            Some(KeyAction::Cancel) => {
                state.number = None;
                close(session, false)?;
            }
            Some(KeyAction::FocusStep(delta)) => {
                self.commit_number(layout, state);
                state.step_focus(layout, delta);
            }
            Some(KeyAction::Activate) => {
                if let Some(item) = focused {
                    self.activate(session, layout, state, &item)?;
                }
            }
            Some(KeyAction::Toggle) => {
                if let Some(item) = focused {
                    if editing::toggle(&item.control) {
                        self.status.value_updated();
                    }
                }
            }
            Some(KeyAction::ValueStep(delta)) => {
                state.number = None;
                if let Some(item) = focused {
                    if editing::step(&item.control, delta) {
                        self.status.editing(&item.label);
                    }
                }
            }
            Some(KeyAction::PopupStep(_) | KeyAction::Confirm | KeyAction::Dismiss) | None => {
                if let (Some(item), Some(input)) = (focused, text_input(&key)) {
                    self.edit(state, &item, input);
                }
            }
        }
        Ok(())
    }

    fn edit(&mut self, state: &mut SessionState, item: &Focusable, input: TextInput) {
        let changed = match &item.control {
            Control::SpinBox(_) | Control::DoubleSpinBox(_) => {
                let id = item.control.id();
                let decimal = matches!(item.control, Control::DoubleSpinBox(_));
                let entry = state
                    .number
                    .get_or_insert_with(|| NumberEntry::new(id));
                if entry.id != id {
                    *entry = NumberEntry::new(id);
                }
                entry.edit(input, decimal)
            }
            control => editing::apply_text(control, input),
        };
        if changed {
            self.status.editing(&item.label);
        }
    }

    fn activate(
        &mut self,
        session: &mut DialogSession<'_>,
        layout: &DialogLayout,
        state: &mut SessionState,
        item: &Focusable,
    ) -> Result<()> {
        match &item.control {
            Control::Button(button) => self.click(session, button)?,
            Control::ListView {
                view,
                on_activate: Some(button),
            } => {
                if view.borrow().cursor().is_some() {
                    self.click(session, button)?;
                }
            }
            Control::ComboBox(combo) => {
                state.overlay = Some(Overlay::choice(&item.label, combo.clone()));
            }
            Control::DateTimeEdit(edit) => {
                state.overlay = Some(Overlay::date_time(&item.label, edit.clone()));
            }
            Control::SpinBox(_) | Control::DoubleSpinBox(_) => {
                self.commit_number(layout, state);
            }
            Control::CheckBox(_) => {
                editing::toggle(&item.control);
            }
            _ => {}
        }
        Ok(())
    }

    /// Runs a button handler. A configuration error raised while opening a
    /// nested dialog only aborts that dialog; anything else ends the session.
    fn click(&mut self, session: &mut DialogSession<'_>, button: &Button) -> Result<()> {
        if !button.is_enabled() {
            self.status.set_raw(format!("{} is not available", button.icon().caption()));
            return Ok(());
        }
        let opened = self.opened;
        match session.click(button, &mut *self) {
            Ok(()) => {
                if self.opened == opened {
                    self.status.value_updated();
                }
                Ok(())
            }
            Err(err) => match err.downcast_ref::<ConfigError>() {
                Some(config) => {
                    log::error!("{config}");
                    self.status.config_error(&config.to_string());
                    Ok(())
                }
                None => Err(err),
            },
        }
    }

    fn commit_number(&mut self, layout: &DialogLayout, state: &mut SessionState) {
        let Some(entry) = state.number.take() else {
            return;
        };
        let Some(item) = layout.focus.iter().find(|item| item.control.id() == entry.id) else {
            return;
        };
        match entry.commit(&item.control) {
            Ok(()) => self.status.value_updated(),
            Err(detail) => self.status.invalid(&detail),
        }
    }

    fn handle_overlay_key(&mut self, state: &mut SessionState, key: KeyEvent) {
        let Some(overlay) = state.overlay.as_mut() else {
            return;
        };
        let context = match overlay {
            Overlay::Choice { .. } => KeymapContext::Popup,
            Overlay::DateTime { .. } => KeymapContext::Prompt,
        };
        match classify_key(&key, context) {
            Some(KeyAction::PopupStep(delta)) => overlay.step(delta),
            Some(KeyAction::Confirm) => match overlay.apply() {
                Ok(()) => {
                    state.overlay = None;
                    self.status.value_updated();
                }
                Err(detail) => self.status.invalid(&detail),
            },
            Some(KeyAction::Dismiss) => {
                state.overlay = None;
                self.status.ready();
            }
            _ => {
                if let Some(input) = text_input(&key) {
                    overlay.edit(input);
                }
            }
        }
    }

    fn prompt_path(&mut self, mut prompt: PathPrompt) -> Option<PathBuf> {
        let backdrop = std::mem::take(&mut self.backdrop);
        let result = self.run_prompt(&backdrop, &mut prompt);
        self.backdrop = backdrop;
        match result {
            Ok(pick) => {
                log::debug!("path prompt answered {pick:?}");
                pick
            }
            Err(err) => {
                log::error!("path prompt failed: {err:#}");
                None
            }
        }
    }

    fn run_prompt(&mut self, backdrop: &[RowView], prompt: &mut PathPrompt) -> Result<Option<PathBuf>> {
        loop {
            let help = self.help(KeymapContext::Prompt);
            let render = PromptRender {
                title: prompt.title(),
                input: &prompt.input,
                hint: Some(prompt.hint()),
                error: prompt.error.as_deref(),
            };
            self.render(backdrop, help.as_deref(), true, None, Some(render))?;

            let tick = self.tick_rate;
            let Some(key) = self.screen()?.next_key(tick)? else {
                continue;
            };
            match classify_key(&key, KeymapContext::Prompt) {
                Some(KeyAction::Confirm) => match prompt.resolve() {
                    Ok(path) => return Ok(Some(path)),
                    Err(detail) => prompt.error = Some(detail),
                },
                Some(KeyAction::Dismiss) => return Ok(None),
                _ => {
                    if let Some(input) = text_input(&key) {
                        prompt.edit(input);
                    }
                }
            }
        }
    }

    fn help(&self, context: KeymapContext) -> Option<String> {
        if self.show_help { help_text(context) } else { None }
    }

    fn render(
        &mut self,
        rows: &[RowView],
        help: Option<&str>,
        cancelable: bool,
        popup: Option<PopupRender<'_>>,
        prompt: Option<PromptRender<'_>>,
    ) -> Result<()> {
        let view = crate::presentation::DialogView {
            breadcrumb: &self.breadcrumb,
            rows,
            status: self.status.message(),
            status_is_error: self.status.severity() == Severity::Error,
            help,
            cancelable,
            popup,
            prompt,
        };
        let screen = self
            .screen
            .as_mut()
            .ok_or_else(|| anyhow!("terminal host has no open dialog"))?;
        screen.render(&view)
    }

    fn screen(&mut self) -> Result<&mut Screen> {
        self.screen
            .as_mut()
            .ok_or_else(|| anyhow!("terminal host has no open dialog"))
    }
}

impl DialogHost for TerminalHost {
    fn exec(&mut self, session: &mut DialogSession<'_>) -> Result<()> {
        let outermost = self.screen.is_none();
        if outermost {
            self.screen = Some(Screen::enter()?);
        }
        self.opened += 1;
        self.breadcrumb.push(session.title().to_string());
        log::debug!("showing dialog '{}'", self.breadcrumb.join(" / "));

        let result = self.run(session);

        let title = self.breadcrumb.pop().unwrap_or_default();
        if outermost {
            self.screen = None;
        } else {
            self.status.returned_from(&title);
        }
        result
    }

    fn pick_existing_file(&mut self, start_dir: &Path, filter: &str) -> Option<PathBuf> {
        self.prompt_path(PathPrompt::file(start_dir, filter))
    }

    fn pick_existing_directory(&mut self, start_dir: &Path) -> Option<PathBuf> {
        self.prompt_path(PathPrompt::directory(start_dir))
    }
}

fn close(session: &mut DialogSession<'_>, confirmed: bool) -> Result<()> {
    match session.close(confirmed) {
        Ok(outcome) => {
            log::debug!("dialog '{}' ended {outcome:?}", session.title());
            Ok(())
        }
        Err(err) => {
            log::error!("saving '{}' failed: {err}", session.title());
            Err(err.into())
        }
    }
}

/// A control the user can move to, with the label of its row.
#[derive(Clone)]
struct Focusable {
    control: Control,
    label: String,
}

struct LayoutRow {
    label: Option<String>,
    depth: usize,
    heading: bool,
    controls: Vec<Control>,
}

/// The dialog's rows flattened for painting: stacks contribute their active
/// page, indented one level.
struct DialogLayout {
    rows: Vec<LayoutRow>,
    focus: Vec<Focusable>,
}

impl DialogLayout {
    fn of(form: &Form) -> Self {
        let mut layout = Self {
            rows: Vec::new(),
            focus: Vec::new(),
        };
        layout.flatten(form, 0);
        layout
    }

    fn flatten(&mut self, form: &Form, depth: usize) {
        for row in form.rows() {
            let controls = match &row.control {
                Control::Stack(stack) => {
                    if let Some(page) = stack.active_page() {
                        self.flatten(page, depth + 1);
                    }
                    continue;
                }
                Control::Row(children) => children.clone(),
                other => vec![other.clone()],
            };
            let heading = controls.len() == 1 && is_heading(&controls[0]);
            let label = row.label.clone();
            for control in &controls {
                if control.is_interactive() {
                    self.focus.push(Focusable {
                        control: control.clone(),
                        label: focus_label(label.as_deref(), control),
                    });
                }
            }
            self.rows.push(LayoutRow {
                label,
                depth,
                heading,
                controls,
            });
        }
    }

    fn rows(&self, state: &SessionState) -> Vec<RowView> {
        self.rows
            .iter()
            .map(|row| RowView {
                label: row.label.clone(),
                depth: row.depth,
                heading: row.heading,
                segments: row
                    .controls
                    .iter()
                    .map(|control| {
                        let id = control.id();
                        let pending = state
                            .number
                            .as_ref()
                            .filter(|entry| entry.id == id)
                            .map(|entry| entry.buffer.as_str());
                        SegmentView {
                            lines: segment_lines(control, pending),
                            focused: state.focus == Some(id),
                            enabled: match control {
                                Control::Button(button) => button.is_enabled(),
                                _ => true,
                            },
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

fn focus_label(row_label: Option<&str>, control: &Control) -> String {
    match (row_label, control) {
        (_, Control::CheckBox(check)) => check.borrow().text.clone(),
        (_, Control::Button(button)) => button.icon().caption().to_string(),
        (Some(label), _) if !label.is_empty() => label.to_string(),
        _ => "selection".to_string(),
    }
}

enum Overlay {
    Choice {
        title: String,
        combo: Shared<ComboBox>,
        options: Vec<String>,
        selected: usize,
    },
    DateTime {
        title: String,
        edit: Shared<DateTimeEdit>,
        input: String,
        error: Option<String>,
    },
}

impl Overlay {
    fn choice(label: &str, combo: Shared<ComboBox>) -> Self {
        let (options, selected) = {
            let current = combo.borrow();
            let options = current.items().iter().map(|item| item.text.clone()).collect();
            (options, current.current().unwrap_or(0))
        };
        Overlay::Choice {
            title: label.to_string(),
            combo,
            options,
            selected,
        }
    }

    fn date_time(label: &str, edit: Shared<DateTimeEdit>) -> Self {
        let input = edit
            .borrow()
            .value()
            .format(editing::DATE_TIME_FORMAT)
            .to_string();
        Overlay::DateTime {
            title: label.to_string(),
            edit,
            input,
            error: None,
        }
    }

    fn step(&mut self, delta: i32) {
        if let Overlay::Choice {
            options, selected, ..
        } = self
        {
            if !options.is_empty() {
                let count = options.len() as i64;
                *selected = (*selected as i64 + i64::from(delta)).rem_euclid(count) as usize;
            }
        }
    }

    fn edit(&mut self, input: TextInput) {
        if let Overlay::DateTime { input: text, error, .. } = self {
            match input {
                TextInput::Insert(ch) => text.push(ch),
                TextInput::Backspace => {
                    text.pop();
                }
                TextInput::Newline => {}
            }
            *error = None;
        }
    }

    fn apply(&mut self) -> Result<(), String> {
        match self {
            Overlay::Choice {
                combo, selected, ..
            } => {
                combo.borrow_mut().set_current(Some(*selected));
                Ok(())
            }
            Overlay::DateTime {
                edit, input, error, ..
            } => match parse_date_time(input) {
                Ok(stamp) => {
                    edit.borrow_mut().set_value(stamp);
                    Ok(())
                }
                Err(detail) => {
                    *error = Some(detail.clone());
                    Err(detail)
                }
            },
        }
    }
}

#[derive(Default)]
struct SessionState {
    focus: Option<usize>,
    index: usize,
    number: Option<NumberEntry>,
    overlay: Option<Overlay>,
}

impl SessionState {
    /// Keeps focus on the same control across relayouts; falls back to the
    /// nearest position when it disappeared.
    fn sync_focus(&mut self, layout: &DialogLayout) {
        if layout.focus.is_empty() {
            self.focus = None;
            self.index = 0;
            return;
        }
        if let Some(id) = self.focus {
            if let Some(position) = layout.focus.iter().position(|item| item.control.id() == id) {
                self.index = position;
                return;
            }
        }
        self.index = self.index.min(layout.focus.len() - 1);
        self.focus = Some(layout.focus[self.index].control.id());
    }

    fn focused<'a>(&self, layout: &'a DialogLayout) -> Option<&'a Focusable> {
        self.focus?;
        layout.focus.get(self.index)
    }

    fn step_focus(&mut self, layout: &DialogLayout, delta: i32) {
        if layout.focus.is_empty() {
            return;
        }
        let count = layout.focus.len() as i64;
        self.index = (self.index as i64 + i64::from(delta)).rem_euclid(count) as usize;
        self.focus = Some(layout.focus[self.index].control.id());
    }

    fn context(&self, layout: &DialogLayout) -> KeymapContext {
        match &self.overlay {
            Some(Overlay::Choice { .. }) => KeymapContext::Popup,
            Some(Overlay::DateTime { .. }) => KeymapContext::Prompt,
            None => self
                .focused(layout)
                .map(|item| context_for(&item.control))
                .unwrap_or(KeymapContext::Dialog),
        }
    }

    fn popup(&self) -> Option<PopupRender<'_>> {
        match &self.overlay {
            Some(Overlay::Choice {
                title,
                options,
                selected,
                ..
            }) => Some(PopupRender {
                title,
                options,
                selected: *selected,
            }),
            _ => None,
        }
    }

    fn prompt(&self) -> Option<PromptRender<'_>> {
        match &self.overlay {
            Some(Overlay::DateTime {
                title,
                input,
                error,
                ..
            }) => Some(PromptRender {
                title,
                input,
                hint: Some("YYYY-MM-DD HH:MM:SS, UTC"),
                error: error.as_deref(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CheckBox, ComboItem, FormArea, Label, LineEdit, Stack, shared};

    fn sample() -> (Form, Shared<ComboBox>) {
        let mut form = Form::new();
        form.append_full_width_row(Control::Label(shared(Label::heading("Network"))));
        form.append_row("Name", Control::LineEdit(shared(LineEdit::new("svc"))));
        form.append_row(
            "",
            Control::CheckBox(shared(CheckBox {
                text: "Enabled".into(),
                checked: true,
            })),
        );
        let picker = shared(ComboBox::new(vec![ComboItem::new("Tcp"), ComboItem::new("Udp")]));
        let mut tcp = Form::new();
        tcp.append_row("Host", Control::LineEdit(shared(LineEdit::new("localhost"))));
        let mut udp = Form::new();
        udp.append_row("Group", Control::LineEdit(shared(LineEdit::new("239.0.0.1"))));
        udp.append_row("Ttl", Control::Label(shared(Label::new("read only"))));
        form.append_full_width_row(Control::ComboBox(picker.clone()));
        form.append_full_width_row(Control::Stack(Stack::new(vec![tcp, udp], picker.clone())));
        (form, picker)
    }

    #[test]
    fn flattens_active_page_with_indent() {
        let (form, picker) = sample();
        let layout = DialogLayout::of(&form);
        let labels: Vec<_> = layout.focus.iter().map(|item| item.label.clone()).collect();
        assert_eq!(labels, vec!["Name", "Enabled", "selection", "Host"]);
        assert!(layout.rows[0].heading);
        assert_eq!(layout.rows.last().map(|row| row.depth), Some(1));

        picker.borrow_mut().set_current(Some(1));
        let layout = DialogLayout::of(&form);
        assert_eq!(layout.focus.len(), 4);
        assert_eq!(layout.rows.len(), 6);
    }

    #[test]
    fn focus_follows_the_control_across_relayout() {
        let (form, picker) = sample();
        let mut state = SessionState::default();
        let layout = DialogLayout::of(&form);
        state.sync_focus(&layout);
        state.step_focus(&layout, 2);
        assert_eq!(state.focused(&layout).map(|item| item.label.as_str()), Some("selection"));

        picker.borrow_mut().set_current(Some(1));
        let layout = DialogLayout::of(&form);
        state.sync_focus(&layout);
        assert_eq!(state.focused(&layout).map(|item| item.label.as_str()), Some("selection"));
        state.step_focus(&layout, 1);
        assert_eq!(state.focused(&layout).map(|item| item.label.as_str()), Some("Group"));
        state.step_focus(&layout, 1);
        assert_eq!(state.focused(&layout).map(|item| item.label.as_str()), Some("Name"));
    }

    #[test]
    fn choice_overlay_applies_selection() {
        let combo = shared(ComboBox::new(vec![ComboItem::new("a"), ComboItem::new("b")]));
        let mut overlay = Overlay::choice("Mode", combo.clone());
        overlay.step(1);
        overlay.apply().unwrap();
        assert_eq!(combo.borrow().current(), Some(1));
    }

    #[test]
    fn date_overlay_reports_bad_input() {
        let edit = shared(DateTimeEdit::default());
        let mut overlay = Overlay::date_time("When", edit.clone());
        overlay.edit(TextInput::Backspace);
        assert!(overlay.apply().is_err());
        let Overlay::DateTime { error, .. } = &overlay else {
            unreachable!()
        };
        assert!(error.is_some());
    }
}
