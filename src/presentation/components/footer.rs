use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::DialogView;

/// Help on top, status below, with a badge telling whether closing the
/// dialog can discard edits.
pub fn render_footer(frame: &mut Frame<'_>, area: Rect, view: &DialogView<'_>) {
    let [help_area, status_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(2)]).areas(area);

    if let Some(help) = view.help {
        let help = Paragraph::new(Line::from(vec![
            Span::styled("Keys ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(help),
        ]))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow));
        frame.render_widget(help, help_area);
    }

    let status_style = if view.status_is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let badge = if view.cancelable {
        Span::styled(" [OK/Cancel]", Style::default().fg(Color::Green))
    } else {
        Span::styled(" [saves on close]", Style::default().fg(Color::Magenta))
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(view.status, status_style),
        badge,
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(status, status_area);
}
