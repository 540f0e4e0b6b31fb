use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::form::{Control, LabelStyle};

use super::super::input::TextInput;
use super::super::keymap::KeymapContext;

pub(super) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(super) fn context_for(control: &Control) -> KeymapContext {
    match control {
        Control::CheckBox(_) => KeymapContext::Toggle,
        Control::LineEdit(_) => KeymapContext::Text,
        Control::TextEdit(_) => KeymapContext::MultiLine,
        Control::SpinBox(_) | Control::DoubleSpinBox(_) => KeymapContext::Number,
        Control::ComboBox(_) => KeymapContext::Choice,
        Control::DateTimeEdit(_) => KeymapContext::DateTime,
        Control::Button(_) => KeymapContext::Button,
        Control::ListView { .. } => KeymapContext::List,
        Control::Label(_) | Control::Stack(_) | Control::Row(_) => KeymapContext::Dialog,
    }
}

/// Text lines a control paints. `pending` replaces a spinner's value while
/// the user is typing a number.
pub(super) fn segment_lines(control: &Control, pending: Option<&str>) -> Vec<String> {
    match control {
        Control::CheckBox(check) => {
            let check = check.borrow();
            let mark = if check.checked { "x" } else { " " };
            vec![format!("[{mark}] {}", check.text)]
        }
        Control::LineEdit(line) => vec![format!("{}\u{2581}", line.borrow().displayed())],
        Control::TextEdit(area) => {
            let text = area.borrow().text.clone();
            let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
            if let Some(last) = lines.last_mut() {
                last.push('\u{2581}');
            }
            lines
        }
        Control::SpinBox(spin) => {
            let shown = pending.map_or_else(|| spin.borrow().value().to_string(), str::to_string);
            vec![format!("\u{2039} {shown} \u{203a}")]
        }
        Control::DoubleSpinBox(spin) => {
            let shown = pending.map_or_else(|| spin.borrow().value().to_string(), str::to_string);
            vec![format!("\u{2039} {shown} \u{203a}")]
        }
        Control::ComboBox(combo) => {
            let combo = combo.borrow();
            let text = combo.current_text().unwrap_or("(none)");
            vec![format!("{text} \u{25be}")]
        }
        Control::DateTimeEdit(edit) => {
            vec![edit.borrow().value().format(DATE_TIME_FORMAT).to_string()]
        }
        Control::Label(label) => vec![label.borrow().text.clone()],
        Control::Button(button) => {
            let shown = button.icon().resolve(false);
            let text = shown.text.unwrap_or(button.icon().fallback);
            match shown.tooltip {
                Some(tooltip) => vec![format!("[{text} {tooltip}]")],
                None => vec![format!("[{text}]")],
            }
        }
        Control::ListView { view, .. } => {
            let view = view.borrow();
            if view.items().is_empty() {
                return vec!["(empty)".to_string()];
            }
            view.items()
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let cursor = if view.cursor() == Some(index) { "\u{203a}" } else { " " };
                    let mark = if view.selection().contains(&index) { "x" } else { " " };
                    format!("{cursor}[{mark}] {item}")
                })
                .collect()
        }
        Control::Stack(_) | Control::Row(_) => Vec::new(),
    }
}

pub(super) fn is_heading(control: &Control) -> bool {
    matches!(control, Control::Label(label) if label.borrow().style == LabelStyle::Heading)
}

/// Applies a raw edit to a text control. Returns whether anything changed.
pub(super) fn apply_text(control: &Control, input: TextInput) -> bool {
    match (control, input) {
        (Control::LineEdit(line), TextInput::Insert(ch)) => {
            line.borrow_mut().text.push(ch);
            true
        }
        (Control::LineEdit(line), TextInput::Backspace) => line.borrow_mut().text.pop().is_some(),
        (Control::TextEdit(area), TextInput::Insert(ch)) => {
            area.borrow_mut().text.push(ch);
            true
        }
        (Control::TextEdit(area), TextInput::Newline) => {
            area.borrow_mut().text.push('\n');
            true
        }
        (Control::TextEdit(area), TextInput::Backspace) => area.borrow_mut().text.pop().is_some(),
        _ => false,
    }
}

pub(super) fn toggle(control: &Control) -> bool {
    match control {
        Control::CheckBox(check) => {
            let mut check = check.borrow_mut();
            check.checked = !check.checked;
            true
        }
        Control::ListView { view, .. } => {
            let mut view = view.borrow_mut();
            match view.cursor() {
                Some(cursor) => {
                    view.toggle(cursor);
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

/// Left/right on spinners, drop-downs and lists.
pub(super) fn step(control: &Control, delta: i32) -> bool {
    match control {
        Control::SpinBox(spin) => {
            spin.borrow_mut().step(i64::from(delta));
            true
        }
        Control::DoubleSpinBox(spin) => {
            let mut spin = spin.borrow_mut();
            let next = spin.value() + f64::from(delta);
            spin.set_value(next);
            true
        }
        Control::ComboBox(combo) => {
            let mut combo = combo.borrow_mut();
            let count = combo.items().len();
            if count == 0 {
                return false;
            }
            let current = combo.current().unwrap_or(0) as i64;
            let next = (current + i64::from(delta)).rem_euclid(count as i64) as usize;
            combo.set_current(Some(next));
            true
        }
        Control::ListView { view, .. } => {
            let mut view = view.borrow_mut();
            let count = view.items().len();
            if count == 0 {
                return false;
            }
            let next = match view.cursor() {
                Some(cursor) => (cursor as i64 + i64::from(delta)).clamp(0, count as i64 - 1) as usize,
                None => 0,
            };
            view.set_cursor(Some(next));
            true
        }
        _ => false,
    }
}

/// Digits typed into a spinner before they are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NumberEntry {
    pub id: usize,
    pub buffer: String,
}

impl NumberEntry {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            buffer: String::new(),
        }
    }

    /// Returns false for characters a number cannot contain.
    pub fn edit(&mut self, input: TextInput, decimal: bool) -> bool {
        match input {
            TextInput::Insert(ch) if ch.is_ascii_digit() => self.buffer.push(ch),
            TextInput::Insert('-') if self.buffer.is_empty() => self.buffer.push('-'),
            TextInput::Insert(ch @ ('.' | 'e' | 'E')) if decimal => self.buffer.push(ch),
            TextInput::Backspace => {
                self.buffer.pop();
            }
            _ => return false,
        }
        true
    }

    /// Stores the typed number in the spinner, clamped to its range.
    pub fn commit(&self, control: &Control) -> Result<(), String> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        match control {
            Control::SpinBox(spin) => {
                let value = parse_integer(&self.buffer)?;
                spin.borrow_mut().set_value(value);
                Ok(())
            }
            Control::DoubleSpinBox(spin) => {
                let value: f64 = self
                    .buffer
                    .parse()
                    .map_err(|_| format!("'{}' is not a number", self.buffer))?;
                spin.borrow_mut().set_value(value);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

// Saturates instead of failing on overflow; the spinner clamps afterwards.
fn parse_integer(text: &str) -> Result<i64, String> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(if negative { i64::MIN } else { i64::MAX })
    } else {
        Err(format!("'{text}' is not a whole number"))
    }
}

pub(super) fn parse_date_time(text: &str) -> Result<chrono::DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_TIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|err| format!("expected YYYY-MM-DD HH:MM:SS ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CheckBox, ComboBox, ComboItem, LineEdit, ListView, SpinBox, shared};

    #[test]
    fn typed_numbers_clamp_into_range() {
        let spin = Control::SpinBox(shared(SpinBox::new(-128, 127)));
        let mut entry = NumberEntry::new(spin.id());
        for ch in "999".chars() {
            assert!(entry.edit(TextInput::Insert(ch), false));
        }
        assert!(!entry.edit(TextInput::Insert('.'), false));
        entry.commit(&spin).unwrap();
        let Control::SpinBox(inner) = &spin else { unreachable!() };
        assert_eq!(inner.borrow().value(), 127);
    }

    #[test]
    fn huge_integers_saturate() {
        assert_eq!(parse_integer("99999999999999999999"), Ok(i64::MAX));
        assert_eq!(parse_integer("-99999999999999999999"), Ok(i64::MIN));
        assert!(parse_integer("-").is_err());
    }

    #[test]
    fn combo_steps_wrap_around() {
        let combo = Control::ComboBox(shared(ComboBox::new(vec![
            ComboItem::new("a"),
            ComboItem::new("b"),
        ])));
        assert!(step(&combo, -1));
        assert_eq!(segment_lines(&combo, None), vec!["b \u{25be}"]);
    }

    #[test]
    fn list_toggle_uses_cursor() {
        let view = shared(ListView::new(vec!["a".into(), "b".into()]));
        let list = Control::ListView {
            view: view.clone(),
            on_activate: None,
        };
        assert!(!toggle(&list));
        step(&list, 1);
        assert!(toggle(&list));
        assert_eq!(view.borrow().single_selection(), Some(0));
        assert_eq!(segment_lines(&list, None)[0], "\u{203a}[x] a");
    }

    #[test]
    fn checkbox_and_text_edits() {
        let check = Control::CheckBox(shared(CheckBox {
            text: "Enabled".into(),
            checked: false,
        }));
        toggle(&check);
        assert_eq!(segment_lines(&check, None), vec!["[x] Enabled"]);

        let line = Control::LineEdit(shared(LineEdit::new("ab")));
        assert!(apply_text(&line, TextInput::Backspace));
        assert!(apply_text(&line, TextInput::Insert('z')));
        assert!(!apply_text(&line, TextInput::Newline));
        assert_eq!(segment_lines(&line, None), vec!["az\u{2581}"]);
    }

    #[test]
    fn parses_typed_dates() {
        let stamp = parse_date_time("2024-02-29 12:30:00").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2024-02-29T12:30:00+00:00");
        assert!(parse_date_time("yesterday").is_err());
    }
}
