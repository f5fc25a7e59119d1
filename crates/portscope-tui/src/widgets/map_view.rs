//! Map pane — a braille canvas showing the world outline, every port, the
//! current matches, the last activated port and the route overlay.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑ ↓ ← →` / `hjkl` | Pan by `pan_step_pct` of the visible span |
//! | `+` / `-` | Zoom in / out one step |
//! | `r` | Fly back to the home camera |
//! | `Enter` | Activate the port nearest the centre |
//!
//! The pane owns the live camera. Every change it makes, whether from a key
//! or an animation frame, is handed back to the app shell, which reports it
//! to the session as a camera move.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::camera::{self, CameraAnimation, Viewport};
use crate::event::Direction;
use crate::theme::Theme;
use portscope_core::route::Polyline;
use portscope_core::surface::Transition;
use portscope_core::{CameraState, Record, ResultSet};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points},
        Block, Widget,
    },
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MapViewState {
    /// Camera currently on screen.
    pub camera: CameraState,
    /// Last activated record, drawn highlighted.
    pub selected: Option<Record>,
    animation: Option<CameraAnimation>,
    transition: Duration,
    pan_step_pct: f64,
    /// Width/height ratio of the canvas in dots, cached from the last render.
    last_aspect: Cell<f64>,
}

impl MapViewState {
    pub fn new(camera: CameraState, transition: Duration, pan_step_pct: u16) -> Self {
        Self {
            camera,
            selected: None,
            animation: None,
            transition,
            pan_step_pct: pan_step_pct.clamp(1, 100) as f64,
            last_aspect: Cell::new(2.0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        camera::viewport(self.camera, self.last_aspect.get())
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start animating towards `target`. Replaces any running animation.
    pub fn begin_transition(&mut self, target: CameraState, transition: Transition, now: Instant) {
        tracing::debug!(?target, ?transition, "map: transition started");
        self.animation = Some(CameraAnimation::new(
            self.camera,
            target,
            transition,
            now,
            self.transition,
        ));
    }

    /// Advance the running animation. Returns the new camera if it moved.
    pub fn tick(&mut self, now: Instant) -> Option<CameraState> {
        let anim = self.animation.as_ref()?;
        let (camera, done) = anim.sample(now);
        if done {
            tracing::debug!(camera = ?camera, "map: transition finished");
            self.animation = None;
        }
        if camera == self.camera {
            return None;
        }
        self.camera = camera;
        Some(camera)
    }

    /// Pan one step. User input interrupts any running animation.
    pub fn pan(&mut self, dir: Direction) -> CameraState {
        self.animation = None;
        let step = self.pan_step_pct;
        let (dx, dy) = match dir {
            Direction::Up => (0.0, step),
            Direction::Down => (0.0, -step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        };
        self.camera = camera::pan(self.camera, &self.viewport(), dx, dy);
        self.camera
    }

    pub fn zoom(&mut self, steps: f64) -> CameraState {
        self.animation = None;
        self.camera = camera::zoom_by(self.camera, steps);
        self.camera
    }

    /// The visible record closest to the centre of the view, if any.
    pub fn nearest<'r>(&self, records: &'r [Record]) -> Option<&'r Record> {
        let view = self.viewport();
        let c = self.camera.center;
        records
            .iter()
            .filter(|r| view.contains(r.coordinates))
            .min_by(|a, b| {
                let da = (a.coordinates.lon - c.lon).hypot(a.coordinates.lat - c.lat);
                let db = (b.coordinates.lon - c.lon).hypot(b.coordinates.lat - c.lat);
                da.total_cmp(&db)
            })
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct MapView<'a> {
    state: &'a MapViewState,
    records: &'a [Record],
    matches: &'a ResultSet,
    route: Option<&'a Polyline>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> MapView<'a> {
    pub fn new(
        state: &'a MapViewState,
        records: &'a [Record],
        matches: &'a ResultSet,
        route: Option<&'a Polyline>,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            records,
            matches,
            route,
            focused,
            theme,
        }
    }
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered().title("Map").border_style(border_style);
        let inner = block.inner(area);

        // Braille cells are 2 dots wide and 4 dots tall.
        if inner.height > 0 {
            let aspect = (inner.width as f64 * 2.0) / (inner.height as f64 * 4.0);
            self.state.last_aspect.set(aspect);
        }
        let view = self.state.viewport();

        let all = points(self.records);
        let matched = points(self.matches);
        let theme = self.theme;
        let label_matches = self.matches.len() <= 12;

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([view.west, view.east])
            .y_bounds([view.south, view.north])
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: theme.map_coastline,
                    resolution: MapResolution::High,
                });
                ctx.layer();

                if let Some(route) = self.route {
                    for (a, b) in route.segments() {
                        ctx.draw(&CanvasLine {
                            x1: a.lon,
                            y1: a.lat,
                            x2: b.lon,
                            y2: b.lat,
                            color: theme.map_route,
                        });
                    }
                }

                ctx.draw(&Points {
                    coords: &all,
                    color: theme.map_port,
                });
                ctx.draw(&Points {
                    coords: &matched,
                    color: theme.map_match,
                });

                if label_matches {
                    for r in self.matches.iter().filter(|r| view.contains(r.coordinates)) {
                        ctx.print(
                            r.coordinates.lon,
                            r.coordinates.lat,
                            Span::styled(
                                r.display_name().to_string(),
                                Style::default().fg(theme.map_match),
                            ),
                        );
                    }
                }

                if let Some(sel) = &self.state.selected {
                    ctx.print(
                        sel.coordinates.lon,
                        sel.coordinates.lat,
                        Span::styled(
                            format!("● {}", sel.display_name()),
                            Style::default()
                                .fg(theme.map_selected)
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            })
            .render(area, buf);
    }
}

fn points(records: &[Record]) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.coordinates.lon, r.coordinates.lat))
        .collect()
}
