//! MonitoringEngine: one owner for detection, escalation, and streaming.
//!
//! The engine is driven one step at a time: a sampling tick, one inbound
//! signaling message, or the completion of an in-flight peer operation. A
//! tick runs to completion, escalation included, before the next step is
//! taken. Peer operations never hold up a tick; they finish in their own
//! step, and a lock in between drops them unfinished.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;
use vigil_core::config::VigilConfig;
use vigil_core::constants::{events as wire, UNLOAD_ISSUE};
use vigil_core::errors::{VigilError, VigilResult};
use vigil_core::models::payloads::{JoinExamPayload, MicToggledPayload, SubmitExamPayload};
use vigil_core::models::{iso_timestamp, AlertEvent, AttemptIdentity, ViolationType};
use vigil_core::traits::{
    Cancellable, CancellationToken, ExitReason, IAlertSink, IExamSubmitter, ILandmarkDetector,
    IMediaDevices, IMessageBus, INavigator, IPeerConnector, IResilienceStore,
};
use vigil_detection::{ConditionEvaluator, ConditionSignals};
use vigil_escalation::{AlertPipeline, LockReport, PipelineOutcome};
use vigil_observability::degradation::components;
use vigil_observability::DegradationTracker;
use vigil_signaling::{SignalStep, StreamingSession};
use vigil_store::EscalationStore;

use crate::handle::MonitorHandle;
use crate::sampler::{FrameSampler, Sample};

/// Everything the engine talks to.
pub struct Collaborators<D, K, F, H, X> {
    pub devices: D,
    pub connector: K,
    pub face_detector: F,
    pub hand_detector: H,
    pub submitter: X,
    pub bus: Arc<dyn IMessageBus>,
    pub store: Arc<dyn IResilienceStore>,
    pub sink: Arc<dyn IAlertSink>,
    pub navigator: Arc<dyn INavigator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    /// Violation limit reached; terminal.
    Locked,
    /// Normal submission; terminal.
    Submitted,
    /// Torn down from outside.
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Engine not running.
    Skipped,
    Evaluated {
        signals: ConditionSignals,
        alerts: Vec<AlertEvent>,
    },
    Locked(LockReport),
}

enum Step {
    Tick,
    Signal(SignalStep),
}

/// Wall-clock anchored to tokio's clock, so paused-time tests see time move.
#[derive(Debug, Clone, Copy)]
struct Clock {
    wall: DateTime<Utc>,
    mono: Instant,
}

impl Clock {
    fn start() -> Self {
        Self {
            wall: Utc::now(),
            mono: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.mono.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.wall + elapsed
    }
}

pub struct MonitoringEngine<D, K, F, H, X>
where
    D: IMediaDevices,
    K: IPeerConnector,
    F: ILandmarkDetector,
    H: ILandmarkDetector,
    X: IExamSubmitter,
{
    config: VigilConfig,
    run_id: Uuid,
    pipeline: AlertPipeline<X>,
    session: StreamingSession<D, K>,
    sampler: FrameSampler<F, H>,
    evaluator: ConditionEvaluator,
    navigator: Arc<dyn INavigator>,
    degradation: DegradationTracker,
    token: CancellationToken,
    state: EngineState,
    ticks: u64,
}

impl<D, K, F, H, X> MonitoringEngine<D, K, F, H, X>
where
    D: IMediaDevices,
    K: IPeerConnector,
    F: ILandmarkDetector,
    H: ILandmarkDetector,
    X: IExamSubmitter,
{
    /// Wire the components together. Escalation state is restored from the
    /// store here; nothing is published until [`start`](Self::start).
    pub fn new(
        config: VigilConfig,
        identity: AttemptIdentity,
        collaborators: Collaborators<D, K, F, H, X>,
    ) -> Self {
        let Collaborators {
            devices,
            connector,
            face_detector,
            hand_detector,
            submitter,
            bus,
            store,
            sink,
            navigator,
        } = collaborators;
        let token = CancellationToken::new();
        let pipeline = AlertPipeline::new(
            identity.clone(),
            &config.monitor,
            EscalationStore::new(store),
            bus.clone(),
            sink,
            submitter,
        );
        let session = StreamingSession::new(
            identity,
            config.capture.clone(),
            config.signaling.clone(),
            bus,
            devices,
            connector,
            token.clone(),
        );
        let sampler = FrameSampler::new(
            face_detector,
            hand_detector,
            &config.capture,
            &config.detector,
        );
        let evaluator = ConditionEvaluator::new(&config.monitor, Utc::now());
        Self {
            config,
            run_id: Uuid::new_v4(),
            pipeline,
            session,
            sampler,
            evaluator,
            navigator,
            degradation: DegradationTracker::new(),
            token,
            state: EngineState::Idle,
            ticks: 0,
        }
    }

    /// Check the configuration and start conditions, announce the candidate,
    /// and bring up the streaming session. Media or peer failures degrade monitoring instead
    /// of failing the start.
    pub async fn start(&mut self, now: DateTime<Utc>) -> VigilResult<()> {
        match self.state {
            EngineState::Idle => {}
            EngineState::Running => return Ok(()),
            EngineState::Locked => return Err(self.locked_error()),
            EngineState::Submitted | EngineState::Stopped => return Ok(()),
        }
        self.config.validate()?;
        if !self.identity().is_complete() {
            return Err(VigilError::MissingIdentity);
        }
        if self.pipeline.is_locked() {
            self.state = EngineState::Locked;
            tracing::warn!(
                attempt_id = %self.identity().student_exam_id,
                "attempt already locked, sampling refused"
            );
            return Err(self.locked_error());
        }
        if self.token.is_cancelled() {
            self.teardown();
            return Ok(());
        }

        let identity = self.identity().clone();
        self.publish(
            wire::JOIN_EXAM,
            &JoinExamPayload {
                email: identity.user_email.clone(),
                student_exam_id: identity.student_exam_id.clone(),
                name: identity.user_name.clone(),
                roll_number: identity.user_roll_number.clone(),
            },
        );
        tracing::info!(
            run_id = %self.run_id,
            attempt_id = %identity.student_exam_id,
            "monitoring started"
        );

        self.evaluator.reset(now);
        self.state = EngineState::Running;
        if let Err(e) = self.session.start().await {
            let component = match &e {
                VigilError::AcquisitionError(_) => components::CAMERA,
                _ => components::PEER_CONNECTION,
            };
            self.degradation
                .record_once(component, &e.to_string(), "monitoring without full media", now);
        }
        Ok(())
    }

    /// One sampling tick: signaling step, sample, evaluate, then the five
    /// sampled conditions in fixed order. A lock short-circuits the rest.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state != EngineState::Running || self.token.is_cancelled() {
            return TickOutcome::Skipped;
        }
        self.ticks += 1;
        let span = vigil_observability::tick_span!(self.identity().student_exam_id, self.ticks);
        self.run_tick(now).instrument(span).await
    }

    async fn run_tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.session.pump().await;
        let sample = self.sampler.sample(self.session.capture_mut(), now).await;
        if self.token.is_cancelled() || self.state != EngineState::Running {
            tracing::debug!("sample discarded after teardown");
            return TickOutcome::Skipped;
        }
        self.track_degradation(&sample, now);

        let signals = self.evaluator.evaluate(&sample.frame);
        let mut alerts = Vec::new();
        for condition in self.evaluator.conditions(&signals) {
            let outcome = self
                .pipeline
                .process(condition.violation, condition.active, &condition.issue, now)
                .await;
            match outcome {
                PipelineOutcome::Alerted { event, .. } => alerts.push(event),
                PipelineOutcome::Locked(report) => {
                    self.finish(ExitReason::Locked);
                    return TickOutcome::Locked(report);
                }
                PipelineOutcome::Suppressed | PipelineOutcome::Inert => {}
            }
        }
        TickOutcome::Evaluated { signals, alerts }
    }

    /// Feed a host-detected tab or focus switch through the alert pipeline.
    pub async fn report_tab_switch(&mut self, issue: &str, now: DateTime<Utc>) -> PipelineOutcome {
        if self.state != EngineState::Running {
            return PipelineOutcome::Inert;
        }
        let outcome = self
            .pipeline
            .process(ViolationType::TabSwitch, true, issue, now)
            .await;
        if outcome.is_locked() {
            self.finish(ExitReason::Locked);
        }
        outcome
    }

    /// The page is closing or reloading: tell the observer, without counting.
    pub fn notify_unload(&self, now: DateTime<Utc>) {
        if self.state == EngineState::Running {
            self.pipeline.announce(ViolationType::TabSwitch, UNLOAD_ISSUE, now);
        }
    }

    /// Normal submission. On failure the error is returned and monitoring
    /// carries on.
    pub async fn submit_exam(&mut self) -> VigilResult<()> {
        if self.pipeline.is_locked() {
            return Err(self.locked_error());
        }
        if self.state == EngineState::Submitted {
            return Ok(());
        }
        let identity = self.identity().clone();
        self.pipeline
            .submitter()
            .submit(&identity.student_exam_id)
            .await?;
        self.publish(
            wire::SUBMIT_EXAM,
            &SubmitExamPayload {
                email: identity.user_email,
                student_exam_id: identity.student_exam_id,
            },
        );
        self.finish(ExitReason::Submitted);
        Ok(())
    }

    /// Mute or unmute the outgoing microphone track. False without a capture.
    pub fn set_microphone(&mut self, enabled: bool, now: DateTime<Utc>) -> bool {
        if !self.session.set_audio_enabled(enabled) {
            return false;
        }
        let identity = self.identity().clone();
        self.publish(
            wire::MIC_TOGGLED,
            &MicToggledPayload {
                student_exam_id: identity.student_exam_id,
                email: identity.user_email,
                enabled,
                timestamp: iso_timestamp(now),
            },
        );
        true
    }

    pub fn clear_alerts(&mut self) -> VigilResult<()> {
        self.pipeline.clear_alerts()
    }

    /// Stop sampling and streaming. Safe to call any number of times.
    pub fn teardown(&mut self) {
        self.token.cancel();
        self.session.teardown();
        self.sampler.release();
        if matches!(self.state, EngineState::Idle | EngineState::Running) {
            self.state = EngineState::Stopped;
        }
    }

    /// Start if needed, then tick at the configured cadence and apply
    /// inbound signaling as it arrives, until locked, submitted, or stopped.
    pub async fn run(&mut self) -> VigilResult<EngineState> {
        let clock = Clock::start();
        self.start(clock.now()).await?;

        let mut interval = tokio::time::interval(self.config.capture.frame_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state == EngineState::Running {
            if self.token.is_cancelled() {
                self.teardown();
                break;
            }
            let open = !self.session.is_closed();
            let step = tokio::select! {
                _ = interval.tick() => Step::Tick,
                Some(signal) = self.session.next_step(), if open => Step::Signal(signal),
            };
            match step {
                Step::Tick => {
                    self.tick(clock.now()).await;
                }
                Step::Signal(signal) => {
                    self.session.apply(signal);
                    self.session.pump().await;
                }
            }
        }
        if self.token.is_cancelled() && self.state == EngineState::Running {
            self.teardown();
        }
        tracing::info!(
            run_id = %self.run_id,
            state = ?self.state,
            ticks = self.ticks,
            "monitoring loop ended"
        );
        Ok(self.state)
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle::new(self.token.clone())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn identity(&self) -> &AttemptIdentity {
        self.pipeline.identity()
    }

    pub fn pipeline(&self) -> &AlertPipeline<X> {
        &self.pipeline
    }

    pub fn session(&self) -> &StreamingSession<D, K> {
        &self.session
    }

    pub fn sampler(&self) -> &FrameSampler<F, H> {
        &self.sampler
    }

    pub fn degradation(&self) -> &DegradationTracker {
        &self.degradation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Lock or submission: stop everything, then leave the exam view.
    fn finish(&mut self, reason: ExitReason) {
        self.token.cancel();
        self.session.teardown();
        self.sampler.release();
        self.state = match reason {
            ExitReason::Locked => EngineState::Locked,
            ExitReason::Submitted => EngineState::Submitted,
        };
        self.navigator.leave_exam(reason);
    }

    fn track_degradation(&mut self, sample: &Sample, now: DateTime<Utc>) {
        let checks = [
            (components::FACE_DETECTOR, sample.face_error.as_ref().map(|e| e.to_string())),
            (components::HAND_DETECTOR, sample.hand_error.as_ref().map(|e| e.to_string())),
            (
                components::AUDIO_ANALYSER,
                (!sample.audio_available).then(|| "analyser unavailable".to_string()),
            ),
        ];
        for (component, failure) in checks {
            match failure {
                Some(failure) => {
                    self.degradation
                        .record_once(component, &failure, "treated as empty", now);
                }
                None if self.degradation.is_degraded(component) => {
                    self.degradation.mark_recovered(component, now);
                }
                None => {}
            }
        }
    }

    fn locked_error(&self) -> VigilError {
        VigilError::SessionLocked {
            attempt_id: self.identity().student_exam_id.clone(),
        }
    }

    fn publish<T: serde::Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.pipeline.bus().publish(event, value),
            Err(e) => tracing::warn!(event = %event, error = %e, "payload serialization failed"),
        }
    }
}
