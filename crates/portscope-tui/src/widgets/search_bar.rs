//! Search bar widget — single-line text input at the top of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//! - `ClearInput` is left to the app, which calls [`SearchBarState::clear`]
//!   and submits the empty query.
//!
//! [`SearchBarState::handle`] reports whether the text changed so the app
//! shell can submit the new query on every edit.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use portscope_core::SearchStatus;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchBarState {
    /// The text typed by the user.
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl SearchBarState {
    /// Apply an editing event. Returns `true` when `query` changed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(query = %self.query, cursor = self.cursor, "search: char inserted");
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = self.prev_boundary();
                self.query.remove(prev);
                self.cursor = prev;
                tracing::debug!(query = %self.query, cursor = self.cursor, "search: backspace");
                true
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = self.prev_boundary();
                false
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.query.len() {
                    self.cursor = self.query[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.query.len());
                }
                false
            }
            _ => false,
        }
    }

    /// Empty the input. Returns `true` if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let had_text = !self.query.is_empty();
        self.query.clear();
        self.cursor = 0;
        had_text
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SearchBar<'a> {
    state: &'a SearchBarState,
    status: &'a SearchStatus,
    matches: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(
        state: &'a SearchBarState,
        status: &'a SearchStatus,
        matches: usize,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            status,
            matches,
            focused,
            theme,
        }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let chars = self.state.query[..self.state.cursor].chars().count();
        let col = u16::try_from(chars).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(col)
            .min(area.right().saturating_sub(1));
        (x, area.y.saturating_add(1))
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Search").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(22)])
            .split(inner);

        let query_line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to search ports",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(query_line).render(chunks[0], buf);

        let indicator = match self.status {
            SearchStatus::Unavailable(_) => {
                Span::styled(self.status.to_string(), self.theme.status_warning)
            }
            SearchStatus::Pending => Span::styled("searching…", self.theme.status_bar),
            SearchStatus::Idle if self.state.query.is_empty() => Span::raw(""),
            SearchStatus::Idle => {
                Span::styled(format!("{} matches", self.matches), self.theme.status_bar)
            }
        };
        Paragraph::new(Line::from(indicator).right_aligned()).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(s: &str) -> SearchBarState {
        let mut state = SearchBarState::default();
        for c in s.chars() {
            state.handle(&AppEvent::Char(c));
        }
        state
    }

    #[test]
    fn typing_reports_changes() {
        let mut state = SearchBarState::default();
        assert!(state.handle(&AppEvent::Char('v')));
        assert!(state.handle(&AppEvent::Char('a')));
        assert_eq!(state.query, "va");
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn backspace_at_start_is_not_a_change() {
        let mut state = typed("va");
        state.handle(&AppEvent::Nav(Direction::Left));
        state.handle(&AppEvent::Nav(Direction::Left));
        assert!(!state.handle(&AppEvent::Backspace));
        assert_eq!(state.query, "va");
    }

    #[test]
    fn backspace_handles_multibyte() {
        let mut state = typed("Mé");
        assert!(state.handle(&AppEvent::Backspace));
        assert_eq!(state.query, "M");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut state = typed("Oska");
        state.handle(&AppEvent::Nav(Direction::Left));
        state.handle(&AppEvent::Nav(Direction::Left));
        state.handle(&AppEvent::Char('a'));
        assert_eq!(state.query, "Osaka");
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn cursor_stays_inside_the_box_for_huge_input() {
        let state = typed(&"x".repeat(70_000));
        let theme = Theme::load_default();
        let bar = SearchBar::new(&state, &SearchStatus::Idle, 0, true, &theme);
        let area = Rect::new(10, 2, 40, 3);
        assert_eq!(bar.cursor_position(area), (49, 3));
    }

    #[test]
    fn cursor_follows_characters_not_bytes() {
        let state = typed("Málaga");
        let theme = Theme::load_default();
        let bar = SearchBar::new(&state, &SearchStatus::Idle, 0, true, &theme);
        assert_eq!(bar.cursor_position(Rect::new(0, 0, 40, 3)), (7, 1));
    }

    #[test]
    fn clear_reports_whether_anything_changed() {
        let mut state = typed("x");
        assert!(state.clear());
        assert!(!state.clear());
    }
}
