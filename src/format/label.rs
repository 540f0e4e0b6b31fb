/// Turns a raw field key into a display label.
///
/// Keys containing an underscore have every `_` replaced by a space and the
/// result trimmed. Other keys are split at case transitions; a run of capitals
/// stays together as one acronym word, except for its last letter when that
/// letter starts a capitalised word.
pub fn format_label(key: &str) -> String {
    if key.contains('_') {
        return key.replace('_', " ").trim().to_string();
    }

    let mut label = String::with_capacity(key.len() + 4);
    let mut held: Option<char> = None;

    for ch in key.chars() {
        if is_upper(ch) {
            if held.is_none() && needs_space(&label) {
                label.push(' ');
            }
            if let Some(prev) = held {
                label.push(prev);
            }
            held = Some(ch);
        } else {
            if let Some(prev) = held.take() {
                if needs_space(&label) {
                    label.push(' ');
                }
                label.push(prev);
            }
            label.push(ch);
        }
    }
    if let Some(prev) = held {
        label.push(prev);
    }
    label
}

// Digits and symbols have no lowercase form, so they group with capitals.
fn is_upper(ch: char) -> bool {
    let mut upper = ch.to_uppercase();
    upper.next() == Some(ch) && upper.next().is_none()
}

fn needs_space(label: &str) -> bool {
    !label.is_empty() && !label.ends_with(' ')
}
