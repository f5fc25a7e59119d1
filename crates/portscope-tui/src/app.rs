//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! Each frame the loop drains store notifications into the surface, advances
//! the camera animation, draws, and then waits up to 16 ms for input.

use crate::{
    event::{self, AppEvent, Direction},
    surface::TerminalSurface,
    theme::Theme,
    widgets::{
        command_bar::{Command, CommandBar, CommandBarState},
        details::DetailsPopup,
        dropdown::Dropdown,
        help::HelpPopup,
        map_view::{MapView, MapViewState},
        search_bar::{SearchBar, SearchBarState},
        status_bar::StatusBar,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use portscope_core::{
    config::UiConfig,
    index::QueryIndex,
    session::Session,
    store::{Notification, ViewState},
    surface::{InteractionSurface, SurfaceEvent, Transition},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Map,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: Session<QueryIndex>,
    pub surface: TerminalSurface,
    /// Latest store snapshot, refreshed from notifications.
    pub view: ViewState,
    pub search_bar: SearchBarState,
    pub command_bar: CommandBarState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub ui: UiConfig,
    pub show_help: bool,
    pub show_route: bool,
    pub quit: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    notifications: UnboundedReceiver<Notification>,
}

impl App {
    pub fn new(session: Session<QueryIndex>, ui: UiConfig, theme: Theme) -> Self {
        let notifications = session.store().subscribe_channel();
        let view = session.store().state();

        let map = MapViewState::new(
            view.camera,
            Duration::from_millis(ui.transition_ms),
            ui.pan_step_pct,
        );
        let show_route = session.route().is_some();

        let state = AppState {
            session,
            surface: TerminalSurface::new(map),
            view,
            search_bar: SearchBarState::default(),
            command_bar: CommandBarState::default(),
            focus: Focus::Search,
            prev_focus: Focus::Search,
            theme,
            ui,
            show_help: false,
            show_route,
            quit: false,
        };

        App {
            state,
            notifications,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_notifications();
            self.tick(Instant::now());

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Forward every pending store notification to the surface.
    fn drain_notifications(&mut self) {
        loop {
            match self.notifications.try_recv() {
                Ok(n) => {
                    let s = &mut self.state;
                    s.session.sync(&n, &mut s.surface);
                    s.view = n.state;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("store channel closed");
                    break;
                }
            }
        }
    }

    fn tick(&mut self, now: Instant) {
        let s = &mut self.state;
        if let Some(ev) = s.surface.tick(now) {
            s.session.handle(ev, &mut s.surface);
        }
    }
}

impl AppState {
    fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            self.handle_command_key(event);
            return;
        }

        if self.surface.details.is_some() && matches!(event, AppEvent::Escape | AppEvent::Enter)
        {
            tracing::debug!("details popup closed");
            self.surface.details = None;
            return;
        }

        match event {
            // Toggle help (only when not typing in the search bar)
            AppEvent::Char('?') if self.focus == Focus::Map => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }

            AppEvent::Char(':') if self.focus == Focus::Map => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }

            AppEvent::Escape => {
                if self.focus == Focus::Search {
                    tracing::debug!("focus: Search -> Map");
                    self.focus = Focus::Map;
                }
            }

            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Search => Focus::Map,
                    Focus::Map | Focus::Command => Focus::Search,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }

            AppEvent::SearchFocus => {
                tracing::debug!("focus -> Search");
                self.focus = Focus::Search;
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => match self.focus {
                Focus::Search => self.handle_search_key(other),
                Focus::Map => self.handle_map_key(other),
                Focus::Command => {}
            },
        }
    }

    fn handle_search_key(&mut self, event: AppEvent) {
        match event {
            AppEvent::Nav(dir @ (Direction::Up | Direction::Down)) => {
                self.surface.dropdown.handle(&AppEvent::Nav(dir));
            }
            AppEvent::Enter => {
                if let Some(record) = self.surface.dropdown.highlighted().cloned() {
                    let event = self.surface.activate(record);
                    self.session.handle(event, &mut self.surface);
                    self.focus = Focus::Map;
                }
            }
            AppEvent::ClearInput => {
                if self.search_bar.clear() {
                    tracing::debug!("search input cleared");
                    self.session.on_query_input("");
                }
            }
            other => {
                if self.search_bar.handle(&other) {
                    self.session.on_query_input(&self.search_bar.query);
                }
            }
        }
    }

    fn handle_map_key(&mut self, event: AppEvent) {
        let moved = match event {
            AppEvent::Nav(dir) => Some(self.surface.map.pan(dir)),
            AppEvent::ZoomIn => Some(self.surface.map.zoom(1.0)),
            AppEvent::ZoomOut => Some(self.surface.map.zoom(-1.0)),
            AppEvent::Reset => {
                self.session.on_reset(&mut self.surface);
                None
            }
            AppEvent::Enter => {
                let nearest = self.surface.map.nearest(self.session.records()).cloned();
                if let Some(record) = nearest {
                    let event = self.surface.inspect(record);
                    self.session.handle(event, &mut self.surface);
                }
                None
            }
            _ => None,
        };
        if let Some(camera) = moved {
            self.session
                .handle(SurfaceEvent::CameraMoved(camera), &mut self.surface);
        }
    }

    fn handle_command_key(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    self.execute(cmd);
                }
                Err(msg) if msg.is_empty() => {
                    // Empty input: just close
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                Err(msg) => {
                    // Show the error; bar stays open
                    self.command_bar.error = Some(msg);
                }
            },
            other => self.command_bar.handle(&other),
        }
    }

    /// Execute a parsed [`Command`] against the application state.
    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.quit = true,
            Command::Help => self.show_help = !self.show_help,
            Command::Reset => {
                self.session.on_reset(&mut self.surface);
            }
            Command::Zoom(zoom) => {
                let target = portscope_core::CameraState {
                    zoom,
                    ..self.surface.map.camera
                };
                self.surface
                    .request_camera_transition(target, Transition::Ease);
            }
            Command::Goto(center) => {
                let target = self.surface.map.camera.centered_on(center);
                self.surface
                    .request_camera_transition(target, Transition::Ease);
            }
            Command::Theme(name) => {
                self.theme = Theme::by_name(&name);
            }
            Command::Route => {
                if self.session.route().is_some() {
                    self.show_route = !self.show_route;
                } else {
                    self.command_bar.error = Some("route overlay is disabled in config".into());
                    self.prev_focus = self.focus;
                    self.focus = Focus::Command;
                }
            }
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Search | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 3-line search bar | map | 1-line status
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    let theme = &state.theme;
    let route = state.show_route.then(|| state.session.route()).flatten();

    frame.render_widget(
        MapView::new(
            &state.surface.map,
            state.session.records(),
            &state.view.results,
            route,
            state.focus == Focus::Map,
            theme,
        ),
        vert[1],
    );
    frame.render_widget(
        StatusBar::new(state.surface.map.camera, &state.view.status, theme),
        vert[2],
    );

    let search = SearchBar::new(
        &state.search_bar,
        &state.view.status,
        state.view.results.len(),
        state.focus == Focus::Search,
        theme,
    );
    let search_cursor = search.cursor_position(vert[0]);
    frame.render_widget(search, vert[0]);

    if state.focus == Focus::Search && state.surface.dropdown.is_open() {
        let dropdown = Dropdown::new(&state.surface.dropdown, state.ui.dropdown_limit, theme);
        let dropdown_area = dropdown.area(vert[0], area);
        frame.render_widget(dropdown, dropdown_area);
    }

    if let Some(record) = &state.surface.details {
        frame.render_widget(DetailsPopup::new(record, theme), vert[1]);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        frame.set_cursor_position((state.command_bar.cursor_col(cmd_area), cmd_area.y));
        return;
    }

    if state.focus == Focus::Search {
        frame.set_cursor_position(search_cursor);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
