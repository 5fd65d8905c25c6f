//! LockController: the one-way ACTIVE → LOCKED transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::models::{LockState, ViolationType};
use vigil_store::EscalationStore;

/// What happened when the attempt was locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockReport {
    pub trigger: ViolationType,
    pub count: u32,
    /// False when the submission call failed; the lock stands regardless.
    pub submitted: bool,
    /// False when the lock flag could not be written to the store.
    pub persisted: bool,
    pub locked_at: DateTime<Utc>,
}

/// Owns the lock flag and writes it through to the Resilience Store.
#[derive(Clone)]
pub struct LockController {
    state: LockState,
    store: EscalationStore,
}

impl LockController {
    pub fn new(initial: LockState, store: EscalationStore) -> Self {
        Self {
            state: initial,
            store,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Lock and persist immediately. Returns `None` when already locked,
    /// otherwise whether the flag reached the store.
    pub fn engage(&mut self) -> Option<bool> {
        if self.state.is_locked() {
            return None;
        }
        self.state = LockState::Locked;
        Some(self.store.persist_lock_state(LockState::Locked))
    }
}
