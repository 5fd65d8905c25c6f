//! # vigil-observability
//!
//! Tracing initialisation, structured log events, span macros, and the
//! degradation tracker used while monitoring runs without full media.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{init_tracing, init_tracing_with_config, init_tracing_with_filter};
