//! AlertPipeline: single owner of emitter, log, ledger, and lock.
//!
//! Every alert source (sampled conditions, tab switches) goes through
//! [`AlertPipeline::process`], so cooldown and escalation state can never
//! diverge between call sites.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;
use vigil_core::config::MonitorConfig;
use vigil_core::constants::events as bus_events;
use vigil_core::errors::{VigilError, VigilResult};
use vigil_core::models::payloads::{AlertPayload, AutoSubmitPayload};
use vigil_core::models::{
    iso_timestamp, AlertEvent, AttemptIdentity, LockState, ViolationLedger, ViolationType,
};
use vigil_core::traits::{IAlertSink, IExamSubmitter, IMessageBus};
use vigil_observability::tracing_setup::events;
use vigil_store::EscalationStore;

use crate::emitter::DebouncedAlertEmitter;
use crate::lock::{LockController, LockReport};
use crate::recent::RecentAlertLog;

/// Result of feeding one condition through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Condition false, or held back by the cooldown.
    Suppressed,
    /// An alert was emitted and counted.
    Alerted { event: AlertEvent, count: u32 },
    /// The alert pushed its type to the maximum and the attempt is now locked.
    Locked(LockReport),
    /// Already locked; nothing was evaluated.
    Inert,
}

impl PipelineOutcome {
    pub fn is_locked(&self) -> bool {
        matches!(self, PipelineOutcome::Locked(_))
    }
}

pub struct AlertPipeline<X: IExamSubmitter> {
    identity: AttemptIdentity,
    max_violations: u32,
    emitter: DebouncedAlertEmitter,
    recent: RecentAlertLog,
    ledger: ViolationLedger,
    lock: LockController,
    store: EscalationStore,
    bus: Arc<dyn IMessageBus>,
    sink: Arc<dyn IAlertSink>,
    submitter: X,
}

impl<X: IExamSubmitter> AlertPipeline<X> {
    /// Build the pipeline from whatever the store remembers about this attempt.
    pub fn new(
        identity: AttemptIdentity,
        config: &MonitorConfig,
        store: EscalationStore,
        bus: Arc<dyn IMessageBus>,
        sink: Arc<dyn IAlertSink>,
        submitter: X,
    ) -> Self {
        let snapshot = store.load();
        tracing::debug!(
            attempt_id = %identity.student_exam_id,
            total = snapshot.ledger.total(),
            locked = snapshot.lock_state.is_locked(),
            "restored escalation state"
        );
        Self {
            identity,
            max_violations: config.max_violations_before_lock,
            emitter: DebouncedAlertEmitter::new(config.cooldown()),
            recent: RecentAlertLog::new(config.recent_alert_capacity),
            ledger: snapshot.ledger,
            lock: LockController::new(snapshot.lock_state, store.clone()),
            store,
            bus,
            sink,
            submitter,
        }
    }

    /// Run one condition through emit → log → publish → count → escalate.
    pub async fn process(
        &mut self,
        violation: ViolationType,
        condition: bool,
        issue: &str,
        now: DateTime<Utc>,
    ) -> PipelineOutcome {
        if self.lock.is_locked() {
            return PipelineOutcome::Inert;
        }
        let Some(event) = self.emitter.evaluate(violation, condition, issue, now) else {
            return PipelineOutcome::Suppressed;
        };

        self.recent.push(event.clone());
        self.sink.append_alert(&event);
        self.publish_alert(violation, &event.issue, now);

        let count = self.ledger.increment(violation);
        events::alert_emitted(violation.code(), &event.issue, count);
        events::violation_counted(violation.code(), count, self.max_violations);
        self.store.persist_ledger(&self.ledger);

        if count >= self.max_violations {
            let span = vigil_observability::escalation_span!(
                self.identity.student_exam_id,
                violation.code()
            );
            if let Some(report) = self.escalate(violation, count, now).instrument(span).await {
                return PipelineOutcome::Locked(report);
            }
        }
        PipelineOutcome::Alerted { event, count }
    }

    /// Publish an alert payload without touching cooldowns or the ledger.
    pub fn announce(&self, violation: ViolationType, issue: &str, now: DateTime<Utc>) {
        self.publish_alert(violation, issue, now);
    }

    /// Operator reset of the ledger and the recent log. Refused once locked.
    pub fn clear_alerts(&mut self) -> VigilResult<()> {
        if self.lock.is_locked() {
            return Err(VigilError::SessionLocked {
                attempt_id: self.identity.student_exam_id.clone(),
            });
        }
        self.ledger.clear();
        self.recent.clear();
        self.store.persist_ledger(&self.ledger);
        tracing::info!(attempt_id = %self.identity.student_exam_id, "alerts cleared");
        Ok(())
    }

    pub fn identity(&self) -> &AttemptIdentity {
        &self.identity
    }

    pub fn ledger(&self) -> &ViolationLedger {
        &self.ledger
    }

    pub fn recent(&self) -> &RecentAlertLog {
        &self.recent
    }

    pub fn emitter(&self) -> &DebouncedAlertEmitter {
        &self.emitter
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn submitter(&self) -> &X {
        &self.submitter
    }

    pub fn bus(&self) -> &Arc<dyn IMessageBus> {
        &self.bus
    }

    /// Steps 1-3 of the lock sequence. Teardown and navigation belong to the owner.
    async fn escalate(
        &mut self,
        trigger: ViolationType,
        count: u32,
        now: DateTime<Utc>,
    ) -> Option<LockReport> {
        // Persisted before the first suspension point.
        let persisted = self.lock.engage()?;
        let attempt_id = self.identity.student_exam_id.clone();
        events::session_locked(&attempt_id, trigger.code(), count);

        let submitted = match self.submitter.submit(&attempt_id).await {
            Ok(()) => true,
            Err(e) => {
                events::submission_failed(&attempt_id, &e.to_string());
                false
            }
        };

        let payload = AutoSubmitPayload {
            student_exam_id: attempt_id,
            email: self.identity.user_email.clone(),
            reason: trigger,
            timestamp: iso_timestamp(now),
        };
        self.publish(bus_events::AUTO_SUBMIT, &payload);

        Some(LockReport {
            trigger,
            count,
            submitted,
            persisted,
            locked_at: now,
        })
    }

    fn publish_alert(&self, violation: ViolationType, issue: &str, now: DateTime<Utc>) {
        let payload = AlertPayload {
            student_exam_id: self.identity.student_exam_id.clone(),
            email: self.identity.user_email.clone(),
            issue: issue.to_string(),
            timestamp: iso_timestamp(now),
        };
        self.publish(violation.event_name(), &payload);
    }

    fn publish<T: serde::Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.bus.publish(event, value),
            Err(e) => tracing::warn!(event = %event, error = %e, "payload serialization failed"),
        }
    }
}
