//! Configuration types for portscope.
//!
//! [`Config::load`] reads `~/.config/portscope/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] layers an
//! explicit file over the defaults. [`Config::defaults`] returns the defaults
//! without touching the filesystem (useful in tests).

use crate::types::{CameraState, Coordinates};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[camera]
longitude = -123.071437
latitude  = 49.29777778
zoom      = 10.12

[dataset]
path = ""

[route]
origin      = [-123.071437, 49.29777778]
destination = [-0.318433451, 39.44416667]

[ui]
theme          = "default"
dropdown_limit = 8
transition_ms  = 600
pan_step_pct   = 10
show_route     = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[camera]` section: the initial view and the reset target.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_longitude() -> f64 { -123.071437 }
fn default_latitude() -> f64 { 49.29777778 }
fn default_zoom() -> f64 { 10.12 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            longitude: default_longitude(),
            latitude: default_latitude(),
            zoom: default_zoom(),
        }
    }
}

impl CameraConfig {
    pub fn camera(&self) -> CameraState {
        CameraState::new(Coordinates::new(self.longitude, self.latitude), self.zoom)
    }
}

/// `[dataset]` section. An empty path selects the bundled ports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: String,
}

impl DatasetConfig {
    pub fn path(&self) -> Option<&Path> {
        (!self.path.is_empty()).then(|| Path::new(&self.path))
    }
}

/// `[route]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_origin")]
    pub origin: [f64; 2],
    #[serde(default = "default_destination")]
    pub destination: [f64; 2],
}

fn default_origin() -> [f64; 2] { [-123.071437, 49.29777778] }
fn default_destination() -> [f64; 2] { [-0.318433451, 39.44416667] }

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            destination: default_destination(),
        }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_dropdown_limit")]
    pub dropdown_limit: usize,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_pan_step_pct")]
    pub pan_step_pct: u16,
    #[serde(default = "default_show_route")]
    pub show_route: bool,
}

fn default_theme() -> String { "default".to_string() }
fn default_dropdown_limit() -> usize { 8 }
fn default_transition_ms() -> u64 { 600 }
fn default_pan_step_pct() -> u16 { 10 }
fn default_show_route() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            dropdown_limit: default_dropdown_limit(),
            transition_ms: default_transition_ms(),
            pan_step_pct: default_pan_step_pct(),
            show_route: default_show_route(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/portscope/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        Self::load_from(&path)
    }

    /// Layer `path` over the built-in defaults. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn route_endpoints(&self) -> (Coordinates, Coordinates) {
        (self.route.origin.into(), self.route.destination.into())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("portscope")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
