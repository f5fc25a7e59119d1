//! Dataset loading — turns a GeoJSON `FeatureCollection` of points into
//! [`Record`]s.
//!
//! Parsing is lenient. A document that is not a feature collection yields no
//! records, a feature without usable `[lon, lat]` coordinates is skipped, and
//! a feature without `properties.name` is kept as an unnamed record. Each of
//! these is logged at `warn` and none of them is an error. Only failing to
//! read the file is.

use crate::error::DatasetError;
use crate::types::{Coordinates, Record};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// The ports bundled into the binary.
pub const BUNDLED_PORTS: &str = include_str!("../data/ports.geojson");

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Value,
}

/// Parse the bundled port dataset.
pub fn bundled() -> Vec<Record> {
    parse(BUNDLED_PORTS)
}

/// Read and parse a GeoJSON file from disk.
pub fn load(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let src = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse(&src);
    tracing::info!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

/// Parse a GeoJSON document. Never fails; see the module docs.
pub fn parse(src: &str) -> Vec<Record> {
    let collection: FeatureCollection = match serde_json::from_str(src) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "dataset is not a feature collection; loading no records");
            return Vec::new();
        }
    };

    collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| match record_from_feature(raw) {
            Some(record) => Some(record),
            None => {
                tracing::warn!(feature = i, "skipping feature without point coordinates");
                None
            }
        })
        .collect()
}

fn record_from_feature(raw: Value) -> Option<Record> {
    let feature: Feature = serde_json::from_value(raw).ok()?;
    let coordinates = point(&feature.geometry?.coordinates)?;
    let mut properties = feature.properties.unwrap_or_default();

    let name = match properties.remove("name") {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    };
    if name.is_none() {
        tracing::warn!(?coordinates, "feature has no name; it will not match searches");
    }

    Some(Record {
        name,
        coordinates,
        properties,
    })
}

fn point(value: &Value) -> Option<Coordinates> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }
    Some(Coordinates { lon, lat })
}
