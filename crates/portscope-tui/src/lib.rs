//! portscope TUI — ratatui application shell.
//!
//! Everything terminal-specific lives here: key mapping, themes, the braille
//! world map and the [`surface::TerminalSurface`] the core session talks to.

pub mod app;
pub mod camera;
pub mod event;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::App;

use portscope_core::{config::UiConfig, index::QueryIndex, session::Session};

/// Run the TUI until the user quits.
///
/// `session` must have been built on a multi-threaded tokio runtime that
/// outlives this call; lookups run on its workers while this thread draws.
pub fn run(session: Session<QueryIndex>, ui: UiConfig, theme: theme::Theme) -> anyhow::Result<()> {
    tracing::info!(records = session.records().len(), theme = %ui.theme, "starting tui");
    App::new(session, ui, theme).run()
}
