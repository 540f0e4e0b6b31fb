use std::time::Duration;

/// What closing a dialog without pressing OK does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosePolicy {
    /// Cancel discards the session's edits, including list and optional
    /// changes made through nested dialogs.
    #[default]
    Cancelable,
    /// Every close saves; the dialog behaves as if it only had OK.
    AlwaysSave,
}

#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub close_policy: ClosePolicy,
    pub max_depth: usize,
    pub tick_rate: Duration,
    pub show_help: bool,
    pub summary_width: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            close_policy: ClosePolicy::Cancelable,
            max_depth: 32,
            tick_rate: Duration::from_millis(250),
            show_help: true,
            summary_width: 24,
        }
    }
}

impl EditorOptions {
    pub fn with_close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_summary_width(mut self, width: usize) -> Self {
        self.summary_width = width.max(1);
        self
    }
}
