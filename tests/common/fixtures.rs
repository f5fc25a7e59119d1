//! Static port fixtures used across harnesses.

use super::builders::{camera, RecordBuilder};
use portscope_core::{CameraState, Record};

pub const VANCOUVER: (f64, f64) = (-123.071437, 49.29777778);
pub const VALENCIA: (f64, f64) = (-0.318433451, 39.44416667);
pub const OSAKA: (f64, f64) = (135.4333, 34.6500);

/// The three-port index used by the end-to-end scenarios.
pub fn three_ports() -> Vec<Record> {
    vec![
        RecordBuilder::new("Vancouver")
            .at(VANCOUVER.0, VANCOUVER.1)
            .property("featureclass", "Port")
            .property("scalerank", 5)
            .property("website", "www.portvancouver.com")
            .build(),
        RecordBuilder::new("Valencia")
            .at(VALENCIA.0, VALENCIA.1)
            .property("featureclass", "Port")
            .property("scalerank", 8)
            .build(),
        RecordBuilder::new("Osaka")
            .at(OSAKA.0, OSAKA.1)
            .property("featureclass", "Port")
            .build(),
    ]
}

/// Home camera matching the default configuration.
pub fn home_camera() -> CameraState {
    camera(VANCOUVER.0, VANCOUVER.1, 10.12)
}

/// A small GeoJSON document exercising the lenient parser: one good port, one
/// without a name, one with out-of-range coordinates and one without geometry.
pub const MIXED_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature",
      "properties": { "name": "Valencia", "featureclass": "Port", "scalerank": 8 },
      "geometry": { "type": "Point", "coordinates": [-0.318433451, 39.44416667] } },
    { "type": "Feature",
      "properties": { "featureclass": "Port" },
      "geometry": { "type": "Point", "coordinates": [10.0, 10.0] } },
    { "type": "Feature",
      "properties": { "name": "Nowhere" },
      "geometry": { "type": "Point", "coordinates": [540.0, 10.0] } },
    { "type": "Feature",
      "properties": { "name": "Ghost" } }
  ]
}"#;
