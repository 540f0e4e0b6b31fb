use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::components::{render_body, render_footer, render_header, render_popup, render_prompt};

/// Everything one frame shows. Rows are owned so the last frame can be kept
/// as the backdrop of a path prompt.
pub(crate) struct DialogView<'a> {
    pub breadcrumb: &'a [String],
    pub rows: &'a [RowView],
    pub status: &'a str,
    pub status_is_error: bool,
    pub help: Option<&'a str>,
    pub cancelable: bool,
    pub popup: Option<PopupRender<'a>>,
    pub prompt: Option<PromptRender<'a>>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RowView {
    pub label: Option<String>,
    pub depth: usize,
    pub heading: bool,
    pub segments: Vec<SegmentView>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SegmentView {
    pub lines: Vec<String>,
    pub focused: bool,
    pub enabled: bool,
}

impl SegmentView {
    pub fn is_multi_line(&self) -> bool {
        self.lines.len() > 1
    }
}

pub(crate) struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

pub(crate) struct PromptRender<'a> {
    pub title: &'a str,
    pub input: &'a str,
    pub hint: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub(crate) fn draw(frame: &mut Frame<'_>, view: &DialogView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);
    render_body(frame, chunks[1], view);
    render_footer(frame, chunks[2], view);

    if let Some(popup) = &view.popup {
        render_popup(frame, popup);
    }
    if let Some(prompt) = &view.prompt {
        render_prompt(frame, prompt);
    }
}
