//! The terminal implementation of [`InteractionSurface`].
//!
//! Camera requests start an animation on the map pane; result sets replace
//! the dropdown contents. Whatever the surface does to the camera comes back
//! out of [`TerminalSurface::tick`] or the app's key handlers as a
//! [`SurfaceEvent`] for the session.

use crate::widgets::{dropdown::DropdownState, map_view::MapViewState};
use portscope_core::surface::{InteractionSurface, SurfaceEvent, Transition};
use portscope_core::{CameraState, Record, ResultSet};
use std::time::Instant;

#[derive(Debug)]
pub struct TerminalSurface {
    pub map: MapViewState,
    pub dropdown: DropdownState,
    /// Record shown in the details popup, if open.
    pub details: Option<Record>,
}

impl TerminalSurface {
    pub fn new(map: MapViewState) -> Self {
        Self {
            map,
            dropdown: DropdownState::default(),
            details: None,
        }
    }

    /// Advance the running camera animation, if any.
    pub fn tick(&mut self, now: Instant) -> Option<SurfaceEvent> {
        self.map.tick(now).map(SurfaceEvent::CameraMoved)
    }

    /// Mark `record` as picked from the dropdown: highlight it on the map.
    pub fn activate(&mut self, record: Record) -> SurfaceEvent {
        self.map.selected = Some(record.clone());
        SurfaceEvent::RecordActivated(record)
    }

    /// Pick a point on the map: highlight it and open its details.
    pub fn inspect(&mut self, record: Record) -> SurfaceEvent {
        self.details = Some(record.clone());
        self.activate(record)
    }
}

impl InteractionSurface for TerminalSurface {
    fn request_camera_transition(&mut self, target: CameraState, transition: Transition) {
        self.map.begin_transition(target, transition, Instant::now());
    }

    fn show_results(&mut self, results: &ResultSet) {
        tracing::debug!(results = results.len(), "surface: results replaced");
        self.dropdown.replace(results);
    }
}
