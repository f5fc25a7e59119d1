//! Interaction surface boundary.
//!
//! The surface is whatever renders the map and takes user input: a terminal
//! canvas here, a map library elsewhere. The core never calls into a
//! rendering library directly. It depends on exactly this contract:
//!
//! - the surface **emits** camera moves and record activations, delivered to
//!   [`Session::on_camera_move`](crate::session::Session::on_camera_move) and
//!   [`Session::on_record_activated`](crate::session::Session::on_record_activated);
//! - the surface **accepts** camera transition requests and the current
//!   result set via [`InteractionSurface`].
//!
//! Styling, marker icons and clustering stay on the surface side.

use crate::types::{CameraState, Record, ResultSet};

/// How a camera transition should be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Short direct glide, used when selecting a result.
    Ease,
    /// Zoom-out-and-in flight, used when resetting the view.
    Fly,
}

/// Events the surface produces for the core.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The user panned or zoomed, or an animation advanced.
    CameraMoved(CameraState),
    /// The user clicked a rendered record or picked it from the dropdown.
    RecordActivated(Record),
}

/// Operations the core requests from the surface.
pub trait InteractionSurface {
    /// Animate the camera to `target`. The surface reports the resulting
    /// movement back as [`SurfaceEvent::CameraMoved`].
    fn request_camera_transition(&mut self, target: CameraState, transition: Transition);

    /// Re-render the list of matches.
    fn show_results(&mut self, results: &ResultSet);
}
