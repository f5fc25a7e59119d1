//! Vim-style command bar — a single-line overlay at the bottom of the screen.
//!
//! Activated by pressing `:` from the map pane. Displays a `:` prefix
//! followed by the typed command. Pressing `Enter` parses and executes the
//! command; `Escape` cancels.
//!
//! # Supported commands
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `reset`, `home` | Fly back to the home camera |
//! | `zoom <0-18>` | Set the zoom level |
//! | `goto <lon> <lat>` | Glide to a coordinate |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `route` | Toggle the route overlay |

use crate::camera::{MAX_ZOOM, MIN_ZOOM};
use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use portscope_core::Coordinates;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Help,
    Reset,
    Zoom(f64),
    Goto(Coordinates),
    Theme(String),
    Route,
}

impl Command {
    /// Parse the text typed after `:`.
    ///
    /// Blank input yields `Err("")`, which the caller treats as "close the
    /// bar without doing anything". Any other error is a message to display.
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            return Err(String::new());
        };
        let args: Vec<&str> = words.collect();

        match (head, args.as_slice()) {
            ("q" | "quit", []) => Ok(Self::Quit),
            ("help", []) => Ok(Self::Help),
            ("reset" | "home", []) => Ok(Self::Reset),
            ("route", []) => Ok(Self::Route),
            ("zoom", [n]) => {
                let zoom: f64 = n
                    .parse()
                    .map_err(|_| format!("zoom: '{n}' is not a number"))?;
                if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                    return Err(format!("zoom: must be between {MIN_ZOOM} and {MAX_ZOOM}"));
                }
                Ok(Self::Zoom(zoom))
            }
            ("zoom", _) => Err("usage: zoom <level>".to_string()),
            ("goto", [lon, lat]) => {
                let lon: f64 = lon
                    .parse()
                    .map_err(|_| format!("goto: '{lon}' is not a longitude"))?;
                let lat: f64 = lat
                    .parse()
                    .map_err(|_| format!("goto: '{lat}' is not a latitude"))?;
                if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                    return Err("goto: coordinates out of range".to_string());
                }
                Ok(Self::Goto(Coordinates::new(lon, lat)))
            }
            ("goto", _) => Err("usage: goto <lon> <lat>".to_string()),
            ("theme", [name]) if Theme::named(name).is_some() => {
                Ok(Self::Theme((*name).to_string()))
            }
            ("theme", [name]) => {
                Err(format!("theme: unknown theme '{name}' (default, gruvbox)"))
            }
            ("theme", _) => Err("usage: theme <name>".to_string()),
            (other, _) => Err(format!("unknown command: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Persistent state for the command bar.
#[derive(Debug, Default)]
pub struct CommandBarState {
    /// The text typed after the `:` prefix.
    pub input: String,
    /// Byte offset of the cursor within `input`.
    pub cursor: usize,
    /// Error message from the last failed command, cleared on the next key.
    pub error: Option<String>,
}

impl CommandBarState {
    /// Reset to a blank, error-free state. Call when opening the bar.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.error = None;
    }

    /// Apply an editing event. `Enter` and `Escape` are handled by the app.
    pub fn handle(&mut self, event: &AppEvent) {
        // Any keypress dismisses the error display so the user can edit again.
        self.error = None;

        match event {
            AppEvent::Char(c) => {
                self.input.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
            }
            AppEvent::ClearInput => {
                self.input.clear();
                self.cursor = 0;
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.input.remove(prev);
                    self.cursor = prev;
                }
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = self.prev_boundary();
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.input.len() {
                    self.cursor = self.input[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.input.len());
                }
            }
            _ => {}
        }
    }

    /// Absolute terminal column of the text cursor within `area`.
    ///
    /// The `:` glyph occupies column 0, so the cursor starts at column 1.
    pub fn cursor_col(&self, area: Rect) -> u16 {
        let chars = self.input[..self.cursor].chars().count();
        let col = u16::try_from(chars).unwrap_or(u16::MAX).saturating_add(1);
        area.x.saturating_add(col).min(area.right().saturating_sub(1))
    }

    fn prev_boundary(&self) -> usize {
        self.input[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Single-row command-bar overlay.
///
/// The caller passes a 1-row `Rect` at the bottom of the terminal.
pub struct CommandBar<'a> {
    state: &'a CommandBarState,
    theme: &'a Theme,
}

impl<'a> CommandBar<'a> {
    pub fn new(state: &'a CommandBarState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let line = if let Some(ref err) = self.state.error {
            Line::from(Span::styled(format!("E  {err}"), self.theme.status_warning))
        } else {
            Line::from(vec![
                Span::styled(":", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.state.input.as_str()),
            ])
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
