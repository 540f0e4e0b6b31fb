use indexmap::IndexMap;

/// Separator used by enumerated option lists and file filter expressions.
pub const OPTION_SEPARATOR: &str = ";;";

pub const DEFAULT_FILE_FILTER: &str = "All files (*)";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKey {
    Label,
    Init,
    Enum,
    Filter,
    Port,
    Icon,
    Other(String),
}

/// Static per-field metadata attached when a record's shape is declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    entries: IndexMap<AnnotationKey, String>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: AnnotationKey, value: impl Into<String>) -> Self {
        self.entries.insert(key, value.into());
        self
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.with(AnnotationKey::Label, label)
    }

    pub fn init(self, text: impl Into<String>) -> Self {
        self.with(AnnotationKey::Init, text)
    }

    pub fn options(self, options: impl Into<String>) -> Self {
        self.with(AnnotationKey::Enum, options)
    }

    pub fn filter(self, filter: impl Into<String>) -> Self {
        self.with(AnnotationKey::Filter, filter)
    }

    pub fn port(self, port: u16) -> Self {
        self.with(AnnotationKey::Port, port.to_string())
    }

    pub fn icon(self, icon: impl Into<String>) -> Self {
        self.with(AnnotationKey::Icon, icon)
    }

    pub fn get(&self, key: &AnnotationKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn other(&self, key: &str) -> Option<&str> {
        self.get(&AnnotationKey::Other(key.to_string()))
    }

    pub fn explicit_label(&self) -> Option<&str> {
        self.get(&AnnotationKey::Label)
    }

    pub fn initial_text(&self) -> Option<&str> {
        self.get(&AnnotationKey::Init)
    }

    pub fn icon_hint(&self) -> Option<&str> {
        self.get(&AnnotationKey::Icon)
    }

    /// Options of an enumerated choice, split on `;;`. Missing annotation
    /// yields an empty list.
    pub fn enum_options(&self) -> Vec<String> {
        match self.get(&AnnotationKey::Enum) {
            Some(raw) if !raw.is_empty() => raw
                .split(OPTION_SEPARATOR)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn file_filter(&self) -> &str {
        self.get(&AnnotationKey::Filter)
            .unwrap_or(DEFAULT_FILE_FILTER)
    }

    /// Default port for an unset address; unparsable values are ignored.
    pub fn default_port(&self) -> Option<u16> {
        let raw = self.get(&AnnotationKey::Port)?;
        match raw.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(err) => {
                log::warn!("ignoring port annotation '{raw}': {err}");
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnnotationKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_options_split_on_double_semicolon() {
        let annotations = Annotations::new().options("Low;;Medium;;High");
        assert_eq!(annotations.enum_options(), vec!["Low", "Medium", "High"]);
        assert!(Annotations::new().enum_options().is_empty());
    }

    #[test]
    fn file_filter_defaults_to_all_files() {
        assert_eq!(Annotations::new().file_filter(), DEFAULT_FILE_FILTER);
        let annotations = Annotations::new().filter("Text files (*.txt)");
        assert_eq!(annotations.file_filter(), "Text files (*.txt)");
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let annotations = Annotations::new().label("First").label("Second");
        assert_eq!(annotations.explicit_label(), Some("Second"));
        assert_eq!(annotations.iter().count(), 1);
    }

    #[test]
    fn unparsable_port_is_ignored() {
        assert_eq!(Annotations::new().port(8080).default_port(), Some(8080));
        let broken = Annotations::new().with(AnnotationKey::Port, "http");
        assert_eq!(broken.default_port(), None);
    }
}
