use std::sync::LazyLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::input::KeyAction;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

/// Which bindings apply: the focused control's kind, or an open overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeymapContext {
    Dialog,
    Text,
    MultiLine,
    Toggle,
    Number,
    Choice,
    DateTime,
    Button,
    List,
    Popup,
    Prompt,
}

impl KeymapContext {
    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "dialog" => Some(KeymapContext::Dialog),
            "text" => Some(KeymapContext::Text),
            "multiline" => Some(KeymapContext::MultiLine),
            "toggle" => Some(KeymapContext::Toggle),
            "number" => Some(KeymapContext::Number),
            "choice" => Some(KeymapContext::Choice),
            "datetime" => Some(KeymapContext::DateTime),
            "button" => Some(KeymapContext::Button),
            "list" => Some(KeymapContext::List),
            "popup" => Some(KeymapContext::Popup),
            "prompt" => Some(KeymapContext::Prompt),
            _ => None,
        }
    }

    // Overlays swallow every key; field contexts fall back to dialog-wide
    // bindings.
    fn inherits_dialog(self) -> bool {
        !matches!(self, KeymapContext::Popup | KeymapContext::Prompt)
    }
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Accept,
    Cancel,
    FocusStep { delta: i32 },
    Activate,
    Toggle,
    ValueStep { delta: i32 },
    PopupStep { delta: i32 },
    Confirm,
    Dismiss,
}

impl RawAction {
    fn into_action(self) -> KeyAction {
        match self {
            RawAction::Accept => KeyAction::Accept,
            RawAction::Cancel => KeyAction::Cancel,
            RawAction::FocusStep { delta } => KeyAction::FocusStep(delta),
            RawAction::Activate => KeyAction::Activate,
            RawAction::Toggle => KeyAction::Toggle,
            RawAction::ValueStep { delta } => KeyAction::ValueStep(delta),
            RawAction::PopupStep { delta } => KeyAction::PopupStep(delta),
            RawAction::Confirm => KeyAction::Confirm,
            RawAction::Dismiss => KeyAction::Dismiss,
        }
    }
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self, String> {
        let contexts = raw
            .contexts
            .iter()
            .filter_map(|ctx| KeymapContext::from_str(ctx))
            .collect::<Vec<_>>();
        if contexts.is_empty() {
            return Err(format!("keymap entry {} must declare at least one context", raw.id));
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo)
                    .map_err(|err| format!("failed to parse combo '{combo}' for {}: {err}", raw.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if combos.is_empty() {
            return Err(format!("keymap entry {} must declare combos", raw.id));
        }
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.clone())
            .collect::<Vec<_>>()
            .join("/");
        let snippet = format!("{combos_display} {}", raw.description);
        Ok(Self {
            action: raw.action.into_action(),
            contexts,
            combos,
            snippet,
        })
    }

    fn matches(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.combos
            .iter()
            .find(|pattern| pattern.matches(key))
            .map(|_| self.action)
    }
}

struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(combo: &str) -> Result<Self, String> {
        let display = combo.trim().to_string();
        if display.is_empty() {
            return Err("combo cannot be empty".into());
        }
        let mut tokens = display
            .split('+')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            return Err("combo must contain key".into());
        };
        let matcher = CodeMatcher::from_token(key_token)?;
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => {
                    return Err(format!("unsupported modifier '{other}'"));
                }
            }
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) {
            return false;
        }
        if !key.modifiers.contains(self.required) {
            return false;
        }
        let extra = KeyModifiers::from_bits_truncate(key.modifiers.bits() & !self.required.bits());
        if self.allow_shift {
            (extra & !KeyModifiers::SHIFT).is_empty()
        } else {
            extra.is_empty()
        }
    }
}

#[derive(Clone)]
enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self, String> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "space" => CodeMatcher::Literal(KeyCode::Char(' ')),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            "up" => CodeMatcher::Literal(KeyCode::Up),
            "down" => CodeMatcher::Literal(KeyCode::Down),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => return Err(format!("unsupported key '{token}'")),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

fn load(source: &str) -> Vec<KeyBinding> {
    let raw_entries: Vec<RawEntry> = match serde_json::from_str(source) {
        Ok(entries) => entries,
        Err(err) => {
            log::error!("invalid keymap: {err}");
            return Vec::new();
        }
    };
    raw_entries
        .into_iter()
        .filter_map(|raw| match KeyBinding::from_raw(raw) {
            Ok(binding) => Some(binding),
            Err(err) => {
                log::error!("{err}");
                None
            }
        })
        .collect()
}

static KEYMAP: LazyLock<Vec<KeyBinding>> = LazyLock::new(|| load(keymap_source!()));

/// Resolves `key` in `context`. Bindings of the context win over dialog-wide
/// ones.
pub(crate) fn classify_key(key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
    let scoped = KEYMAP
        .iter()
        .filter(|binding| binding.contexts.contains(&context))
        .find_map(|binding| binding.matches(key));
    if scoped.is_some() || !context.inherits_dialog() {
        return scoped;
    }
    KEYMAP
        .iter()
        .filter(|binding| binding.contexts.contains(&KeymapContext::Dialog))
        .find_map(|binding| binding.matches(key))
}

pub(crate) fn help_text(context: KeymapContext) -> Option<String> {
    let snippets = KEYMAP
        .iter()
        .filter(|binding| {
            binding.contexts.contains(&context)
                || (context.inherits_dialog() && binding.contexts.contains(&KeymapContext::Dialog))
        })
        .map(|binding| binding.snippet.clone())
        .collect::<Vec<_>>();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join(" \u{2022} "))
    }
}
