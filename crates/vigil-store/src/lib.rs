//! # vigil-store
//!
//! Resilience Store implementations and the codec that maps the violation
//! ledger and lock flag onto store keys.
//!
//! ## Modules
//!
//! - `memory`: `MemoryStore`, a `DashMap`-backed store for tests and embedding
//! - `json_file`: `JsonFileStore`, one human-readable JSON file on disk
//! - `snapshot`: `EscalationStore`, typed load/save of `{ledger, lockState}`

pub mod json_file;
pub mod memory;
pub mod snapshot;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::{EscalationSnapshot, EscalationStore};
