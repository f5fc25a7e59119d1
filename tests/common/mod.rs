//! Shared test utilities for portscope integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Fakes that sleep use `tokio::time`, so harnesses run
//! deterministically under `#[tokio::test(start_paused = true)]`.

pub mod builders;
pub mod fakes;
pub mod fixtures;

pub use builders::*;
pub use fakes::*;
pub use fixtures::*;
