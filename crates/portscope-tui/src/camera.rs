//! Camera helpers for the terminal surface: viewport bounds, panning,
//! zooming and animated transitions.
//!
//! Zoom follows web-map convention: at zoom 0 the whole 360° of longitude is
//! visible and each zoom step halves the span.

use portscope_core::surface::Transition;
use portscope_core::{CameraState, Coordinates};
use std::time::{Duration, Instant};

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;
const ZOOM_STEP: f64 = 1.0;
const MAX_LAT: f64 = 85.0;

/// Geographic rectangle covered by the map pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Viewport {
    pub fn contains(&self, c: Coordinates) -> bool {
        (self.west..=self.east).contains(&c.lon) && (self.south..=self.north).contains(&c.lat)
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }
}

/// Bounds visible for `camera` in a pane whose width/height ratio (in
/// equal-sized dots) is `aspect`.
pub fn viewport(camera: CameraState, aspect: f64) -> Viewport {
    let lon_span = (360.0 / 2f64.powf(camera.zoom.max(MIN_ZOOM))).min(360.0);
    let lat_span = (lon_span / aspect.max(0.1)).min(180.0);
    let c = camera.center;
    Viewport {
        west: c.lon - lon_span / 2.0,
        east: c.lon + lon_span / 2.0,
        south: c.lat - lat_span / 2.0,
        north: c.lat + lat_span / 2.0,
    }
}

/// Move the centre by `pct` percent of the visible span in each axis.
pub fn pan(camera: CameraState, view: &Viewport, dx_pct: f64, dy_pct: f64) -> CameraState {
    let lon = wrap_lon(camera.center.lon + view.lon_span() * dx_pct / 100.0);
    let lat = (camera.center.lat + view.lat_span() * dy_pct / 100.0).clamp(-MAX_LAT, MAX_LAT);
    camera.centered_on(Coordinates::new(lon, lat))
}

pub fn zoom_by(camera: CameraState, steps: f64) -> CameraState {
    CameraState {
        zoom: (camera.zoom + steps * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM),
        ..camera
    }
}

pub fn wrap_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// In-flight camera transition.
#[derive(Debug, Clone)]
pub struct CameraAnimation {
    from: CameraState,
    to: CameraState,
    transition: Transition,
    started: Instant,
    duration: Duration,
}

impl CameraAnimation {
    pub fn new(
        from: CameraState,
        to: CameraState,
        transition: Transition,
        started: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            from,
            to,
            transition,
            started,
            duration,
        }
    }

    /// Camera at `now`, and whether the animation has finished.
    pub fn sample(&self, now: Instant) -> (CameraState, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let e = ease_in_out(t);

        let dlon = wrap_lon(self.to.center.lon - self.from.center.lon);
        let lon = wrap_lon(self.from.center.lon + dlon * e);
        let lat = lerp(self.from.center.lat, self.to.center.lat, e);
        let mut zoom = lerp(self.from.zoom, self.to.zoom, e);

        if self.transition == Transition::Fly {
            // Pull back mid-flight in proportion to the distance covered.
            let dist = dlon.hypot(self.to.center.lat - self.from.center.lat);
            let arc = (dist / 30.0).min(4.0);
            zoom -= arc * (std::f64::consts::PI * e).sin();
        }

        (
            CameraState::new(Coordinates::new(lon, lat), zoom.clamp(MIN_ZOOM, MAX_ZOOM)),
            false,
        )
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
