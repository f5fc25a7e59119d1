//! Test builders — ergonomic constructors for records and wired-up sessions.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use super::fixtures::home_camera;
use portscope_core::index::RecordSource;
use portscope_core::search::SearchCoordinator;
use portscope_core::session::Session;
use portscope_core::store::ViewStore;
use portscope_core::{CameraState, Coordinates, Record};
use serde_json::{Map, Value};
use tokio::runtime::Handle;

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] fixtures.
///
/// ```rust
/// let port = RecordBuilder::new("Valencia")
///     .at(-0.318433451, 39.44416667)
///     .property("featureclass", "Port")
///     .build();
/// ```
pub struct RecordBuilder {
    name: Option<String>,
    coordinates: Coordinates,
    properties: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            coordinates: Coordinates::new(0.0, 0.0),
            properties: Map::new(),
        }
    }

    pub fn unnamed() -> Self {
        Self {
            name: None,
            coordinates: Coordinates::new(0.0, 0.0),
            properties: Map::new(),
        }
    }

    pub fn at(mut self, lon: f64, lat: f64) -> Self {
        self.coordinates = Coordinates::new(lon, lat);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Record {
        Record {
            name: self.name,
            coordinates: self.coordinates,
            properties: self.properties,
        }
    }
}

// ---------------------------------------------------------------------------
// Wiring helpers
// ---------------------------------------------------------------------------

/// A camera centred on `(lon, lat)` at `zoom`.
pub fn camera(lon: f64, lat: f64, zoom: f64) -> CameraState {
    CameraState::new(Coordinates::new(lon, lat), zoom)
}

/// Coordinator over `source` writing to a fresh store, spawned on the
/// current runtime. Must be called from inside a tokio test.
pub fn coordinator<S: RecordSource>(source: S) -> SearchCoordinator<S> {
    SearchCoordinator::new(source, ViewStore::new(home_camera()), Handle::current())
}

/// Session over `source` with [`home_camera`] and no route.
pub fn session<S: RecordSource>(source: S) -> Session<S> {
    Session::new(coordinator(source), home_camera(), None)
}

/// Display names of `records`, in order.
pub fn names(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.display_name().to_string()).collect()
}
