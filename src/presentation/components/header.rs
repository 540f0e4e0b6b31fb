use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::super::view::DialogView;

/// Titles of the open dialogs, outermost first.
pub fn render_header(frame: &mut Frame<'_>, area: Rect, view: &DialogView<'_>) {
    let mut spans = Vec::new();
    for (index, title) in view.breadcrumb.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" \u{203a} ", Style::default().fg(Color::DarkGray)));
        }
        let style = if index + 1 == view.breadcrumb.len() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(title.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
