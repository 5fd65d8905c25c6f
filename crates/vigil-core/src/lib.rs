//! # vigil-core
//!
//! Foundation crate for the Vigil exam integrity monitor.
//! Defines the data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{MonitorConfig, VigilConfig};
pub use errors::{VigilError, VigilResult};
pub use models::{
    AlertEvent, AttemptIdentity, LandmarkSet, LockState, ObservationFrame, ViolationLedger,
    ViolationType,
};
