use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ViolationType;

/// Per-type violation counters. Survives reloads through the Resilience Store.
///
/// Serializes as a flat JSON object keyed by event name, e.g. `{"eye_off":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationLedger {
    counts: BTreeMap<ViolationType, u32>,
}

impl ViolationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, violation: ViolationType) -> u32 {
        self.counts.get(&violation).copied().unwrap_or(0)
    }

    /// Increment the counter for `violation` and return the new count.
    pub fn increment(&mut self, violation: ViolationType) -> u32 {
        let entry = self.counts.entry(violation).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    /// Set a counter directly. Used when restoring persisted state.
    pub fn set(&mut self, violation: ViolationType, count: u32) {
        if count == 0 {
            self.counts.remove(&violation);
        } else {
            self.counts.insert(violation, count);
        }
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViolationType, u32)> + '_ {
        self.counts.iter().map(|(&t, &c)| (t, c))
    }
}
