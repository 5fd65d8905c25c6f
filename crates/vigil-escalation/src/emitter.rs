//! DebouncedAlertEmitter: turns per-tick conditions into alerts.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use vigil_core::models::{AlertEvent, ViolationType};
use vigil_observability::tracing_setup::events;

use crate::cooldown::CooldownTable;

/// How a condition that stays true is treated between emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Emits on the clear-to-active transition only; a sustained condition
    /// stays silent until it clears.
    RisingEdge,
    /// Every true evaluation is an occurrence; only the cooldown gates it.
    Cooldown,
}

impl Trigger {
    /// Visual conditions are latched. Audio conditions and host-reported
    /// tab switches are discrete occurrences.
    pub fn of(violation: ViolationType) -> Self {
        match violation {
            ViolationType::NoFace
            | ViolationType::MultipleFaces
            | ViolationType::HandObstruction => Trigger::RisingEdge,
            ViolationType::LoudVoice | ViolationType::VoiceNoFace | ViolationType::TabSwitch => {
                Trigger::Cooldown
            }
        }
    }
}

/// Per-type debounce state: the cooldown entry plus whether the condition
/// was true on the previous evaluation.
///
/// An alert is emitted iff the condition is true, the type's cooldown
/// (measured from its last emission) has expired, and, for latched types,
/// the condition was false on the previous evaluation. A rising edge that
/// lands inside the cooldown is swallowed, not deferred.
#[derive(Debug, Clone)]
pub struct DebouncedAlertEmitter {
    cooldowns: CooldownTable,
    active: HashMap<ViolationType, bool>,
}

impl DebouncedAlertEmitter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldowns: CooldownTable::new(cooldown),
            active: HashMap::new(),
        }
    }

    pub fn evaluate(
        &mut self,
        violation: ViolationType,
        condition: bool,
        issue: &str,
        now: DateTime<Utc>,
    ) -> Option<AlertEvent> {
        let was_active = self.active.insert(violation, condition).unwrap_or(false);
        if !condition {
            return None;
        }
        if was_active && Trigger::of(violation) == Trigger::RisingEdge {
            return None;
        }
        if let Some(remaining) = self.cooldowns.remaining(violation, now) {
            if !was_active {
                events::alert_suppressed(violation.code(), remaining.num_milliseconds());
            }
            return None;
        }
        self.cooldowns.record(violation, now);
        Some(AlertEvent::new(violation, issue, now))
    }

    /// Whether the condition for `violation` was true on its last evaluation.
    pub fn is_active(&self, violation: ViolationType) -> bool {
        self.active.get(&violation).copied().unwrap_or(false)
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }
}
