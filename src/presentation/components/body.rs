use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use super::super::view::{DialogView, RowView, SegmentView};

const INDENT: &str = "  ";

pub fn render_body(frame: &mut Frame<'_>, area: Rect, view: &DialogView<'_>) {
    let title = view.breadcrumb.last().cloned().unwrap_or_default();
    let block = Block::default().title(title).borders(Borders::ALL);

    if view.rows.is_empty() {
        let placeholder = Paragraph::new("Nothing to edit").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let label_width = label_column(view.rows, area.width);
    let content_width = (area.width as usize)
        .saturating_sub(label_width + 4)
        .max(8);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut focus_line = None;
    for row in view.rows {
        if row.segments.iter().any(|segment| segment.focused) {
            focus_line = Some(lines.len());
        }
        push_row(&mut lines, row, label_width, content_width);
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = match focus_line {
        Some(line) if visible > 0 && line >= visible => line + 1 - visible,
        _ => 0,
    };
    let body = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(body, area);
}

fn label_column(rows: &[RowView], width: u16) -> usize {
    let widest = rows
        .iter()
        .filter(|row| !row.heading)
        .filter_map(|row| {
            row.label
                .as_deref()
                .map(|label| label.width() + INDENT.len() * row.depth)
        })
        .max()
        .unwrap_or(0);
    widest.min(width as usize / 3)
}

fn push_row(lines: &mut Vec<Line<'static>>, row: &RowView, label_width: usize, content_width: usize) {
    let indent = INDENT.repeat(row.depth);
    if row.heading {
        let text = row
            .segments
            .iter()
            .flat_map(|segment| segment.lines.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(
            format!("{indent}{text}"),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        return;
    }

    let prefix = match &row.label {
        Some(label) => format!("{} ", pad(&format!("{indent}{label}"), label_width)),
        None => indent.clone(),
    };
    let blank = " ".repeat(prefix.width());

    if !row.segments.iter().any(SegmentView::is_multi_line) {
        let mut spans = vec![Span::raw(prefix)];
        for (index, segment) in row.segments.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            let text = segment.lines.first().cloned().unwrap_or_default();
            spans.push(Span::styled(text, segment_style(segment)));
        }
        lines.push(Line::from(spans));
        return;
    }

    let mut first = true;
    for segment in &row.segments {
        for raw in &segment.lines {
            for piece in wrap_line(raw, content_width) {
                let lead = if first { prefix.clone() } else { blank.clone() };
                first = false;
                lines.push(Line::from(vec![
                    Span::raw(lead),
                    Span::styled(piece, segment_style(segment)),
                ]));
            }
        }
    }
}

fn wrap_line(raw: &str, width: usize) -> Vec<String> {
    if raw.is_empty() {
        return vec![String::new()];
    }
    wrap(raw, width)
        .into_iter()
        .map(|piece| piece.into_owned())
        .collect()
}

fn segment_style(segment: &SegmentView) -> Style {
    let style = if segment.enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if segment.focused {
        style.fg(Color::Yellow).add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}
