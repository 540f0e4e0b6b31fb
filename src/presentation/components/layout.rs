use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centers a `width` x `height` box in `area`, shrunk to fit.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_and_clamps() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(popup_rect(area, 40, 6), Rect::new(20, 9, 40, 6));
        let small = popup_rect(Rect::new(0, 0, 10, 4), 40, 6);
        assert_eq!((small.width, small.height), (10, 4));
    }
}
