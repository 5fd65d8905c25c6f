//! # vigil-monitor
//!
//! The Sampling Loop and the engine that owns every other component for one
//! exam attempt.
//!
//! ## Modules
//!
//! - `sampler`: `FrameSampler`, capture read, detectors with timeouts, audio level
//! - `engine`: `MonitoringEngine`, start checks, ticks, escalation wiring, run loop
//! - `handle`: `MonitorHandle`, external stop switch

pub mod engine;
pub mod handle;
pub mod sampler;

use std::sync::Arc;

use vigil_core::config::StoreConfig;
use vigil_core::errors::StoreError;
use vigil_core::traits::IResilienceStore;
use vigil_store::JsonFileStore;

pub use engine::{Collaborators, EngineState, MonitoringEngine, TickOutcome};
pub use handle::MonitorHandle;
pub use sampler::{FrameSampler, Sample};

/// Open the file-backed Resilience Store named in the `store` config section.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn IResilienceStore>, StoreError> {
    let store = JsonFileStore::open(&config.path)?;
    tracing::info!(path = %config.path, "resilience store opened");
    Ok(Arc::new(store))
}
