//! # vigil-escalation
//!
//! Everything between "a condition is true" and "the attempt is locked":
//! per-type cooldowns, the debounced emitter, the bounded recent-alert log,
//! the violation ledger, and the one-way lock controller. `AlertPipeline`
//! is the single owner of all of it.

pub mod cooldown;
pub mod emitter;
pub mod lock;
pub mod pipeline;
pub mod recent;

pub use cooldown::CooldownTable;
pub use emitter::{DebouncedAlertEmitter, Trigger};
pub use lock::{LockController, LockReport};
pub use pipeline::{AlertPipeline, PipelineOutcome};
pub use recent::RecentAlertLog;
