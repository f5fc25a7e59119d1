//! Result dropdown — the list of matches shown under the search bar.
//!
//! The dropdown holds its own copy of the result set, replaced wholesale
//! whenever the store reports new results. The cursor is reset on every
//! replacement so it never points past the end of a shorter list.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use portscope_core::{Record, ResultSet};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

#[derive(Debug, Default)]
pub struct DropdownState {
    pub results: ResultSet,
    /// Index of the highlighted row.
    pub cursor: usize,
}

impl DropdownState {
    pub fn replace(&mut self, results: &ResultSet) {
        self.results = results.clone();
        self.cursor = 0;
    }

    pub fn is_open(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn highlighted(&self) -> Option<&Record> {
        self.results.get(self.cursor)
    }

    /// Move the cursor with `Nav(Up)` / `Nav(Down)`; other events are ignored.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < self.results.len() {
                    self.cursor += 1;
                }
            }
            _ => {}
        }
    }
}

pub struct Dropdown<'a> {
    state: &'a DropdownState,
    limit: usize,
    theme: &'a Theme,
}

impl<'a> Dropdown<'a> {
    pub fn new(state: &'a DropdownState, limit: usize, theme: &'a Theme) -> Self {
        Self {
            state,
            limit: limit.max(1),
            theme,
        }
    }

    /// Area the dropdown occupies when anchored below `anchor`.
    pub fn area(&self, anchor: Rect, bounds: Rect) -> Rect {
        let rows = self.state.results.len().min(self.limit) as u16;
        let height = (rows + 2).min(bounds.bottom().saturating_sub(anchor.bottom()));
        Rect {
            x: anchor.x,
            y: anchor.bottom(),
            width: anchor.width.min(48),
            height,
        }
    }
}

impl Widget for Dropdown<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.is_open() || area.height < 3 {
            return;
        }
        Clear.render(area, buf);

        let total = self.state.results.len();
        let title = if total > self.limit {
            format!(" {} of {} ", self.limit.min(total), total)
        } else {
            format!(" {total} ")
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border_focused);

        // Scroll the window so the cursor stays visible.
        let visible = (area.height.saturating_sub(2) as usize).min(self.limit);
        let offset = self.state.cursor.saturating_sub(visible.saturating_sub(1));

        let items: Vec<ListItem> = self
            .state
            .results
            .iter()
            .skip(offset)
            .take(visible)
            .map(|r| ListItem::new(Line::from(r.display_name().to_string())))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor - offset));

        StatefulWidget::render(
            List::new(items)
                .block(block)
                .style(self.theme.dropdown_item)
                .highlight_style(self.theme.dropdown_highlight),
            area,
            buf,
            &mut list_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portscope_core::Coordinates;
    use pretty_assertions::assert_eq;

    fn results(names: &[&str]) -> ResultSet {
        names
            .iter()
            .map(|n| Record::new(*n, Coordinates::new(0.0, 0.0)))
            .collect()
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = DropdownState::default();
        state.replace(&results(&["Vancouver", "Valencia"]));
        state.handle(&AppEvent::Nav(Direction::Up));
        assert_eq!(state.cursor, 0);
        state.handle(&AppEvent::Nav(Direction::Down));
        state.handle(&AppEvent::Nav(Direction::Down));
        assert_eq!(state.cursor, 1);
        assert_eq!(state.highlighted().unwrap().display_name(), "Valencia");
    }

    #[test]
    fn replace_resets_cursor() {
        let mut state = DropdownState::default();
        state.replace(&results(&["A", "B", "C"]));
        state.cursor = 2;
        state.replace(&results(&["D"]));
        assert_eq!(state.cursor, 0);
        assert_eq!(state.highlighted().unwrap().display_name(), "D");
    }

    #[test]
    fn empty_dropdown_is_closed() {
        let mut state = DropdownState::default();
        assert!(!state.is_open());
        assert!(state.highlighted().is_none());
        state.replace(&results(&["A"]));
        assert!(state.is_open());
    }

    #[test]
    fn renders_names_in_order() {
        let mut state = DropdownState::default();
        state.replace(&results(&["Vancouver", "Valencia"]));
        let theme = Theme::load_default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        Dropdown::new(&state, 8, &theme).render(area, &mut buf);
        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(1).contains("Vancouver"));
        assert!(row(2).contains("Valencia"));
    }
}
