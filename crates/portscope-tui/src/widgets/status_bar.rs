//! Status line — camera readout on the left, search warning and keybinding
//! hints on the right.

use crate::theme::Theme;
use portscope_core::{CameraState, SearchStatus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    camera: CameraState,
    status: &'a SearchStatus,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(camera: CameraState, status: &'a SearchStatus, theme: &'a Theme) -> Self {
        Self {
            camera,
            status,
            theme,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.status_bar);

        let mut spans = vec![Span::raw(format!(" {} ", self.camera))];
        if let SearchStatus::Unavailable(_) = self.status {
            spans.push(Span::styled(
                format!(" {} ", self.status),
                self.theme.status_warning,
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let hint = " q:quit  ?:help  :cmd ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            self.theme.status_bar.add_modifier(Modifier::DIM),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portscope_core::Coordinates;

    fn line(status: SearchStatus) -> String {
        let theme = Theme::load_default();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        let camera = CameraState::new(Coordinates::new(-123.071437, 49.29777778), 10.12);
        StatusBar::new(camera, &status, &theme).render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_camera_readout() {
        let text = line(SearchStatus::Idle);
        assert!(text.contains("Longitude: -123.0714 | Latitude: 49.30 | Zoom: 10.12"));
        assert!(!text.contains("unavailable"));
    }

    #[test]
    fn warns_when_search_is_unavailable() {
        let text = line(SearchStatus::Unavailable("backend down".into()));
        assert!(text.contains("search unavailable"));
    }
}
