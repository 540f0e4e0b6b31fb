use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the terminal host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Accept,
    Cancel,
    FocusStep(i32),
    Activate,
    Toggle,
    ValueStep(i32),
    PopupStep(i32),
    Confirm,
    Dismiss,
}

/// Raw edits for keys no binding claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextInput {
    Insert(char),
    Backspace,
    Newline,
}

pub(crate) fn text_input(key: &KeyEvent) -> Option<TextInput> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) => Some(TextInput::Insert(ch)),
        KeyCode::Backspace => Some(TextInput::Backspace),
        KeyCode::Enter => Some(TextInput::Newline),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_chords_are_not_text() {
        let plain = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::SHIFT);
        assert_eq!(text_input(&plain), Some(TextInput::Insert('a')));
        let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(text_input(&chord), None);
        let back = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(text_input(&back), Some(TextInput::Backspace));
    }
}
