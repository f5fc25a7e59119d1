//! Ratatui widgets for the portscope TUI.

pub mod command_bar;
pub mod details;
pub mod dropdown;
pub mod help;
pub mod map_view;
pub mod search_bar;
pub mod status_bar;

use ratatui::layout::Rect;

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(80, 20, area), area);
        assert_eq!(centered_rect(10, 3, area), Rect::new(5, 1, 10, 3));
    }
}
