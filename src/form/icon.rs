/// Button face: a theme icon with a short text fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub theme_name: &'static str,
    pub fallback: &'static str,
    pub tooltip: &'static str,
}

/// What a host actually shows for an [`Icon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub theme_icon: Option<&'static str>,
    pub text: Option<&'static str>,
    pub tooltip: Option<&'static str>,
}

impl Icon {
    pub const fn new(theme_name: &'static str, fallback: &'static str, tooltip: &'static str) -> Self {
        Self {
            theme_name,
            fallback,
            tooltip,
        }
    }

    /// Uses the theme icon when the host has it, else the fallback text. The
    /// tooltip is only set when it says something the fallback does not.
    pub fn resolve(&self, has_theme_icon: bool) -> ResolvedIcon {
        let (theme_icon, text) = if has_theme_icon {
            (Some(self.theme_name), None)
        } else {
            (None, Some(self.fallback))
        };
        ResolvedIcon {
            theme_icon,
            text,
            tooltip: (self.fallback != self.tooltip).then_some(self.tooltip),
        }
    }

    /// Caption used to find a button by name; the tooltip is the full label.
    pub fn caption(&self) -> &'static str {
        self.tooltip
    }
}

pub const BROWSE_FILE: Icon = Icon::new("document-open", "Browse...", "Browse...");
pub const BROWSE_DIRECTORY: Icon = Icon::new("folder-open", "Browse...", "Browse...");
pub const EDIT: Icon = Icon::new("edit-symbolic", "\u{270e}", "Edit...");
pub const CLEAR: Icon = Icon::new("edit-clear", "\u{00d7}", "Clear");
pub const LIST_ADD: Icon = Icon::new("list-add", "+", "Add...");
pub const LIST_EDIT: Icon = Icon::new("document-edit-symbolic", "\u{270e}", "Edit...");
pub const LIST_REMOVE: Icon = Icon::new("edit-delete-symbolic", "\u{00d7}", "Remove");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_text_without_theme_icon() {
        let shown = CLEAR.resolve(false);
        assert_eq!(shown.theme_icon, None);
        assert_eq!(shown.text, Some("\u{00d7}"));
        assert_eq!(shown.tooltip, Some("Clear"));
    }

    #[test]
    fn theme_icon_wins_when_available() {
        let shown = LIST_ADD.resolve(true);
        assert_eq!(shown.theme_icon, Some("list-add"));
        assert_eq!(shown.text, None);
    }

    #[test]
    fn tooltip_omitted_when_it_repeats_the_fallback() {
        assert_eq!(BROWSE_FILE.resolve(false).tooltip, None);
        assert_eq!(BROWSE_FILE.resolve(true).tooltip, None);
    }
}
