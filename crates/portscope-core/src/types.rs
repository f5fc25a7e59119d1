//! Core types for portscope-core.
//!
//! This module defines the data shared by every layer: the searchable
//! [`Record`], its [`Coordinates`], the [`CameraState`] describing the map
//! viewport, and the [`ResultSet`] produced by a lookup.

use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

/// A single searchable, mappable entity loaded from the dataset.
///
/// Records are immutable after load. A record whose source feature had no
/// `name` is kept so it can still be drawn, but it never matches a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Name used for matching and display.
    pub name: Option<String>,
    /// Position of the record on the map.
    pub coordinates: Coordinates,
    /// Opaque display properties carried over from the source feature.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: Some(name.into()),
            coordinates,
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Label shown in the dropdown and on the map.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    /// Look up a display property as text. Numbers and booleans are rendered
    /// with their JSON formatting; empty strings and nulls count as absent.
    pub fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Rows for the record details popup, in display order.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        vec![
            ("Name", self.display_name().to_string()),
            ("Type", or_dash(self.property("featureclass"))),
            ("Scalerank", or_dash(self.property("scalerank"))),
            ("Natlscale", or_dash(self.property("natlscale"))),
            (
                "Website",
                self.property("website").unwrap_or_else(|| "none".to_string()),
            ),
        ]
    }
}

/// Ordered outcome of applying a query to the index.
pub type ResultSet = Vec<Record>;

/// Map viewport: where the camera is centred and how far it is zoomed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: Coordinates,
    pub zoom: f64,
}

impl CameraState {
    pub const fn new(center: Coordinates, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Same zoom, different centre.
    pub fn centered_on(self, center: Coordinates) -> Self {
        Self { center, ..self }
    }
}

impl std::fmt::Display for CameraState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Longitude: {:.4} | Latitude: {:.2} | Zoom: {:.2}",
            self.center.lon, self.center.lat, self.zoom
        )
    }
}

/// Search progress as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No lookup is in flight; the result set is current.
    #[default]
    Idle,
    /// A lookup for the latest query has been dispatched.
    Pending,
    /// The latest lookup failed. The previous result set is still shown.
    Unavailable(String),
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Idle => write!(f, "idle"),
            SearchStatus::Pending => write!(f, "searching"),
            SearchStatus::Unavailable(_) => write!(f, "search unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_for_unnamed() {
        let rec = Record {
            name: None,
            coordinates: Coordinates::new(0.0, 0.0),
            properties: Default::default(),
        };
        assert_eq!(rec.display_name(), "(unnamed)");
    }

    #[test]
    fn details_default_website_to_none() {
        let rec = Record::new("Valencia", Coordinates::new(-0.318, 39.444))
            .with_property("featureclass", "Port")
            .with_property("scalerank", 4)
            .with_property("website", "");
        let details = rec.details();
        assert_eq!(details[0], ("Name", "Valencia".to_string()));
        assert_eq!(details[1], ("Type", "Port".to_string()));
        assert_eq!(details[2], ("Scalerank", "4".to_string()));
        assert_eq!(details[3], ("Natlscale", "-".to_string()));
        assert_eq!(details[4], ("Website", "none".to_string()));
    }

    #[test]
    fn camera_display_matches_sidebar_format() {
        let cam = CameraState::new(Coordinates::new(-123.071437, 49.29777778), 10.12);
        assert_eq!(
            cam.to_string(),
            "Longitude: -123.0714 | Latitude: 49.30 | Zoom: 10.12"
        );
    }

    #[test]
    fn centered_on_keeps_zoom() {
        let cam = CameraState::new(Coordinates::new(0.0, 0.0), 3.5);
        let moved = cam.centered_on(Coordinates::new(10.0, 20.0));
        assert_eq!(moved.zoom, 3.5);
        assert_eq!(moved.center, Coordinates::new(10.0, 20.0));
    }
}
