pub const READY_STATUS: &str = "Ready. Press Ctrl+S for OK.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// Last message shown under the dialog body.
#[derive(Debug, Clone)]
pub struct StatusLine {
    text: String,
    severity: Severity,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: READY_STATUS.to_string(),
            severity: Severity::Info,
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    fn info(&mut self, text: String) {
        self.text = text;
        self.severity = Severity::Info;
    }

    fn error(&mut self, text: String) {
        self.text = text;
        self.severity = Severity::Error;
    }

    pub fn set_raw(&mut self, text: impl Into<String>) {
        self.info(text.into());
    }

    pub fn ready(&mut self) {
        self.info(READY_STATUS.to_string());
    }

    pub fn editing(&mut self, label: &str) {
        self.info(format!("Editing {label}"));
    }

    pub fn value_updated(&mut self) {
        self.info("Value updated".to_string());
    }

    pub fn returned_from(&mut self, title: &str) {
        self.info(format!("Back from {title}"));
    }

    pub fn invalid(&mut self, detail: &str) {
        self.error(format!("Invalid input: {detail}"));
    }

    pub fn config_error(&mut self, detail: &str) {
        self.error(format!("Cannot open editor: {detail}"));
    }

    pub fn message(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
