//! Degradation events with their recovery status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::models::DegradationEvent;

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

/// A tracked degradation event with recovery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degraded-mode transitions so the host can tell why monitoring is partial.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Record a degradation for `component` unless one is already active.
    /// Returns true when a new event was recorded.
    pub fn record_once(
        &mut self,
        component: &str,
        failure: &str,
        fallback: &str,
        at: DateTime<Utc>,
    ) -> bool {
        if self.is_degraded(component) {
            return false;
        }
        self.record(DegradationEvent {
            component: component.to_string(),
            failure: failure.to_string(),
            fallback_used: fallback.to_string(),
            timestamp: at,
        });
        true
    }

    /// Mark a component as recovered.
    pub fn mark_recovered(&mut self, component: &str, at: DateTime<Utc>) {
        for tracked in self.events.iter_mut().rev() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(at);
                break;
            }
        }
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    /// Get all events.
    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    /// Get active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }
}
