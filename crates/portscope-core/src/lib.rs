//! portscope-core — search, state and interaction loop for portscope.
//!
//! This crate holds everything that can be tested without a terminal: the
//! query index, the take-latest search coordinator, the view-state store, the
//! surface boundary and the session that wires them together.
//!
//! # Architecture
//!
//! ```text
//! input ──► Session ──► SearchCoordinator ──► QueryIndex
//!              │                │
//!              │                └──► ViewStore ──► subscribers ──► surface
//!              └──► surface.request_camera_transition
//! ```
//!
//! Lookups run as `tokio` tasks; store notifications reach the surface loop
//! through a `tokio` channel.

pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod route;
pub mod search;
pub mod session;
pub mod store;
pub mod surface;
pub mod types;

pub use types::{CameraState, Coordinates, Record, ResultSet, SearchStatus};
