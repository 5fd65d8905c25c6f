//! Typed access to the escalation state kept in the Resilience Store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vigil_core::constants::{STORE_KEY_ALERT_COUNTS, STORE_KEY_LOCKED};
use vigil_core::errors::StoreError;
use vigil_core::models::{LockState, ViolationLedger, ViolationType};
use vigil_core::traits::IResilienceStore;
use vigil_observability::tracing_setup::events;

/// Everything that must survive a reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationSnapshot {
    pub ledger: ViolationLedger,
    pub lock_state: LockState,
}

/// Reads and writes the ledger and lock flag under their store keys.
///
/// Reads never fail: unreadable or corrupt values fall back to defaults
/// with a warning.
#[derive(Clone)]
pub struct EscalationStore {
    store: Arc<dyn IResilienceStore>,
}

impl EscalationStore {
    pub fn new(store: Arc<dyn IResilienceStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> EscalationSnapshot {
        EscalationSnapshot {
            ledger: self.load_ledger(),
            lock_state: self.load_lock_state(),
        }
    }

    pub fn load_ledger(&self) -> ViolationLedger {
        match self.store.get(STORE_KEY_ALERT_COUNTS) {
            Ok(Some(raw)) => parse_ledger(&raw),
            Ok(None) => ViolationLedger::new(),
            Err(e) => {
                tracing::warn!(key = STORE_KEY_ALERT_COUNTS, error = %e, "ledger read failed");
                ViolationLedger::new()
            }
        }
    }

    pub fn load_lock_state(&self) -> LockState {
        match self.store.get(STORE_KEY_LOCKED) {
            Ok(Some(flag)) => LockState::from_flag(&flag),
            Ok(None) => LockState::Active,
            Err(e) => {
                tracing::warn!(key = STORE_KEY_LOCKED, error = %e, "lock flag read failed");
                LockState::Active
            }
        }
    }

    pub fn save_ledger(&self, ledger: &ViolationLedger) -> Result<(), StoreError> {
        let body = serde_json::to_string(ledger).map_err(|e| StoreError::Corrupt {
            key: STORE_KEY_ALERT_COUNTS.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(STORE_KEY_ALERT_COUNTS, &body)
    }

    pub fn save_lock_state(&self, state: LockState) -> Result<(), StoreError> {
        self.store.set(STORE_KEY_LOCKED, state.as_flag())
    }

    pub fn save(&self, snapshot: &EscalationSnapshot) -> Result<(), StoreError> {
        self.save_ledger(&snapshot.ledger)?;
        self.save_lock_state(snapshot.lock_state)
    }

    /// Best-effort ledger write: failures are logged, never returned.
    pub fn persist_ledger(&self, ledger: &ViolationLedger) -> bool {
        match self.save_ledger(ledger) {
            Ok(()) => true,
            Err(e) => {
                events::persistence_failed(STORE_KEY_ALERT_COUNTS, &e.to_string());
                false
            }
        }
    }

    /// Best-effort lock flag write: failures are logged, never returned.
    pub fn persist_lock_state(&self, state: LockState) -> bool {
        match self.save_lock_state(state) {
            Ok(()) => true,
            Err(e) => {
                events::persistence_failed(STORE_KEY_LOCKED, &e.to_string());
                false
            }
        }
    }
}

/// Lenient ledger parsing: unknown keys and non-numeric counts are skipped.
fn parse_ledger(raw: &str) -> ViolationLedger {
    let mut ledger = ViolationLedger::new();
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(
                key = STORE_KEY_ALERT_COUNTS,
                error = %e,
                "corrupt ledger, starting empty"
            );
            return ledger;
        }
    };
    let Some(map) = value.as_object() else {
        tracing::warn!(key = STORE_KEY_ALERT_COUNTS, "ledger is not a JSON object, starting empty");
        return ledger;
    };
    for (name, count) in map {
        let (Some(violation), Some(count)) = (ViolationType::from_event_name(name), count.as_u64())
        else {
            tracing::debug!(key = %name, "skipping unknown ledger entry");
            continue;
        };
        ledger.set(violation, u32::try_from(count).unwrap_or(u32::MAX));
    }
    ledger
}
