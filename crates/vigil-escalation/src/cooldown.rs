//! CooldownTable: last-fired timestamp per violation type. Memory only.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use vigil_core::models::ViolationType;

#[derive(Debug, Clone)]
pub struct CooldownTable {
    window: Duration,
    last_fired: HashMap<ViolationType, DateTime<Utc>>,
}

impl CooldownTable {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn last_fired(&self, violation: ViolationType) -> Option<DateTime<Utc>> {
        self.last_fired.get(&violation).copied()
    }

    /// Eligible once a full window has passed since the last emission.
    pub fn is_eligible(&self, violation: ViolationType, now: DateTime<Utc>) -> bool {
        self.remaining(violation, now).is_none()
    }

    /// Time left before `violation` may fire again, if any.
    pub fn remaining(&self, violation: ViolationType, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_fired.get(&violation)?;
        let elapsed = now - *last;
        if elapsed >= self.window {
            None
        } else {
            Some(self.window - elapsed)
        }
    }

    pub fn record(&mut self, violation: ViolationType, at: DateTime<Utc>) {
        self.last_fired.insert(violation, at);
    }

    /// Re-arm every type.
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}
