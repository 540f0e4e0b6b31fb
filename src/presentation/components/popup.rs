use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::{PopupRender, PromptRender};
use super::layout::popup_rect;

/// Drop-down list of a combo box, drawn over the dialog.
pub fn render_popup(frame: &mut Frame<'_>, popup: &PopupRender<'_>) {
    let Some(last) = popup.options.len().checked_sub(1) else {
        return;
    };
    let bounds = frame.area();
    let widest = popup
        .options
        .iter()
        .map(|option| option.width())
        .fold(popup.title.width(), usize::max);
    // Two border cells plus the highlight marker.
    let width = fit(widest + 4, bounds.width);
    let height = fit(popup.options.len() + 2, bounds.height).max(3);
    let area = popup_rect(bounds, width, height);
    frame.render_widget(Clear, area);

    let items = popup
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()));
    let list = List::new(items)
        .block(Block::bordered().title(popup.title))
        .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("\u{00bb} ");
    let mut state = ListState::default().with_selected(Some(popup.selected.min(last)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn fit(wanted: usize, available: u16) -> u16 {
    u16::try_from(wanted).unwrap_or(u16::MAX).min(available)
}

/// Single-line input box, used for typed dates and for paths.
pub fn render_prompt(frame: &mut Frame<'_>, prompt: &PromptRender<'_>) {
    let bounds = frame.area();
    let widest = prompt.input.width().max(prompt.title.width());
    let width = fit((widest + 8).max(40), bounds.width);
    let area = popup_rect(bounds, width, 6);
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(vec![
        Span::raw("> "),
        Span::styled(prompt.input.to_string(), Style::default().fg(Color::Yellow)),
    ])];
    if let Some(hint) = prompt.hint {
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(error) = prompt.error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(prompt.title));
    frame.render_widget(widget, area);

    let cursor_x = area
        .x
        .saturating_add(3)
        .saturating_add(prompt.input.width() as u16)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
}
