use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use test_fixtures::{
    at, centered_face, identity, FakeConnector, FakeDevices, RecordingBus, RecordingNavigator,
    RecordingSink, RecordingSubmitter, ScriptedDetector,
};
use vigil_core::config::VigilConfig;
use vigil_core::constants::events;
use vigil_core::errors::{DetectorError, VigilError};
use vigil_core::models::{AttemptIdentity, ViolationType};
use vigil_core::traits::{ExitReason, IResilienceStore};
use vigil_escalation::PipelineOutcome;
use vigil_monitor::{Collaborators, EngineState, MonitoringEngine, TickOutcome};
use vigil_observability::degradation::components;
use vigil_signaling::SessionState;
use vigil_store::{JsonFileStore, MemoryStore};

type Engine = MonitoringEngine<
    FakeDevices,
    FakeConnector,
    ScriptedDetector,
    ScriptedDetector,
    RecordingSubmitter,
>;

struct Rig {
    config: VigilConfig,
    identity: AttemptIdentity,
    bus: RecordingBus,
    devices: FakeDevices,
    connector: FakeConnector,
    faces: ScriptedDetector,
    hands: ScriptedDetector,
    submitter: RecordingSubmitter,
    store: Arc<dyn IResilienceStore>,
    sink: RecordingSink,
    navigator: RecordingNavigator,
}

impl Rig {
    fn new() -> Self {
        Self {
            config: VigilConfig::default(),
            identity: identity(),
            bus: RecordingBus::new(),
            devices: FakeDevices::working(),
            connector: FakeConnector::new(),
            faces: ScriptedDetector::new("face_mesh"),
            hands: ScriptedDetector::new("hands"),
            submitter: RecordingSubmitter::new(),
            store: Arc::new(MemoryStore::new()),
            sink: RecordingSink::new(),
            navigator: RecordingNavigator::new(),
        }
    }

    fn max_violations(mut self, max: u32) -> Self {
        self.config.monitor.max_violations_before_lock = max;
        self
    }

    fn engine(&self) -> Engine {
        MonitoringEngine::new(
            self.config.clone(),
            self.identity.clone(),
            Collaborators {
                devices: self.devices.clone(),
                connector: self.connector.clone(),
                face_detector: self.faces.clone(),
                hand_detector: self.hands.clone(),
                submitter: self.submitter.clone(),
                bus: Arc::new(self.bus.clone()),
                store: self.store.clone(),
                sink: Arc::new(self.sink.clone()),
                navigator: Arc::new(self.navigator.clone()),
            },
        )
    }

    async fn started(&self) -> Engine {
        let mut engine = self.engine();
        engine.start(at(0)).await.unwrap();
        engine
    }
}

fn alert_types(outcome: &TickOutcome) -> Vec<ViolationType> {
    match outcome {
        TickOutcome::Evaluated { alerts, .. } => alerts.iter().map(|a| a.violation).collect(),
        _ => Vec::new(),
    }
}

#[tokio::test]
async fn scenario_a_sustained_absence_alerts_once() {
    let rig = Rig::new();
    let mut engine = rig.started().await;

    let mut per_tick = Vec::new();
    for i in 1..=6 {
        per_tick.push(alert_types(&engine.tick(at(i * 1000)).await));
    }

    assert_eq!(
        per_tick,
        vec![
            vec![],
            vec![],
            vec![],
            vec![],
            vec![ViolationType::NoFace],
            vec![],
        ]
    );
    assert_eq!(engine.pipeline().ledger().count(ViolationType::NoFace), 1);
    assert_eq!(rig.bus.count("eye_off"), 1);
    assert_eq!(rig.sink.alerts().len(), 1);
    assert_eq!(
        rig.store.get("exam_alert_counts").unwrap().as_deref(),
        Some(r#"{"eye_off":1}"#)
    );
}

#[tokio::test]
async fn continuous_absence_never_escalates_on_its_own() {
    let rig = Rig::new();
    let mut engine = rig.started().await;

    for second in 1..=45 {
        let outcome = engine.tick(at(second * 1000)).await;
        assert!(!matches!(outcome, TickOutcome::Locked(_)), "locked at {second}s");
    }
    assert_eq!(rig.bus.count("eye_off"), 1);
    assert_eq!(engine.pipeline().ledger().count(ViolationType::NoFace), 1);
    assert!(engine.pipeline().emitter().is_active(ViolationType::NoFace));
    assert!(rig.submitter.calls().is_empty());
    assert_eq!(engine.state(), EngineState::Running);
}

#[tokio::test]
async fn absence_that_clears_and_returns_alerts_again() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    engine.tick(at(5000)).await;
    rig.faces.set_fallback(vec![centered_face()]);
    engine.tick(at(6000)).await;
    rig.faces.set_fallback(vec![]);
    let outcome = engine.tick(at(13_000)).await;
    assert_eq!(alert_types(&outcome), vec![ViolationType::NoFace]);
    assert_eq!(rig.bus.count("eye_off"), 2);
}

#[tokio::test]
async fn face_reappearing_resets_absence() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    engine.tick(at(4000)).await;
    rig.faces.set_fallback(vec![centered_face()]);
    engine.tick(at(4500)).await;
    rig.faces.set_fallback(vec![]);
    let outcome = engine.tick(at(9000)).await;
    let TickOutcome::Evaluated { signals, alerts } = outcome else {
        panic!("expected evaluation");
    };
    assert!(!signals.no_face);
    assert_eq!(signals.face_absent_ms, 4500);
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn scenario_c_loud_voice_without_face_fires_both() {
    let rig = Rig::new();
    rig.devices.set_audio_sample(Some(154));
    let mut engine = rig.started().await;

    let outcome = engine.tick(at(2500)).await;
    assert_eq!(
        alert_types(&outcome),
        vec![ViolationType::LoudVoice, ViolationType::VoiceNoFace]
    );
    let ledger = engine.pipeline().ledger();
    assert_eq!(ledger.count(ViolationType::LoudVoice), 1);
    assert_eq!(ledger.count(ViolationType::VoiceNoFace), 1);
    assert_eq!(rig.bus.count("loud_voice"), 1);
    assert_eq!(rig.bus.count("voice_no_face"), 1);
}

#[tokio::test]
async fn multiple_faces_and_obstruction_are_reported() {
    let rig = Rig::new();
    rig.faces.set_fallback(vec![centered_face(), centered_face()]);
    rig.hands.set_fallback(vec![centered_face()]);
    let mut engine = rig.started().await;

    let outcome = engine.tick(at(100)).await;
    assert_eq!(
        alert_types(&outcome),
        vec![ViolationType::MultipleFaces, ViolationType::HandObstruction]
    );
    assert_eq!(rig.bus.published_on("multiple_faces")[0]["issue"], "2 faces detected");
}

#[tokio::test]
async fn lock_short_circuits_the_rest_of_the_tick() {
    let rig = Rig::new().max_violations(1);
    rig.devices.set_audio_sample(Some(200));
    let mut engine = rig.started().await;

    let outcome = engine.tick(at(5000)).await;
    let TickOutcome::Locked(report) = outcome else {
        panic!("expected lock, got {outcome:?}");
    };
    assert_eq!(report.trigger, ViolationType::NoFace);
    assert_eq!(rig.bus.count("eye_off"), 1);
    assert_eq!(rig.bus.count("loud_voice"), 0);
    assert_eq!(rig.bus.count("voice_no_face"), 0);
    assert_eq!(rig.bus.count(events::AUTO_SUBMIT), 1);
    assert_eq!(rig.submitter.calls(), vec!["se-42".to_string()]);
    assert_eq!(rig.navigator.exits(), vec![ExitReason::Locked]);

    assert_eq!(engine.state(), EngineState::Locked);
    assert_eq!(engine.session().state(), SessionState::TornDown);
    assert_eq!(rig.devices.log().stops, 1);
    assert_eq!(rig.connector.log().closed, 1);
    assert!(engine.sampler().is_released());

    assert_eq!(engine.tick(at(20_000)).await, TickOutcome::Skipped);
    assert_eq!(rig.submitter.calls().len(), 1);
    assert!(matches!(
        engine.clear_alerts(),
        Err(VigilError::SessionLocked { .. })
    ));
}

#[tokio::test]
async fn persisted_lock_refuses_to_start() {
    let rig = Rig::new();
    rig.store.set("exam_locked", "true").unwrap();
    let mut engine = rig.engine();

    let err = engine.start(at(0)).await.unwrap_err();
    assert!(matches!(err, VigilError::SessionLocked { .. }));
    assert_eq!(engine.state(), EngineState::Locked);
    assert!(rig.bus.published().is_empty());
    assert_eq!(rig.devices.log().acquisitions, 0);
    assert_eq!(engine.tick(at(1000)).await, TickOutcome::Skipped);
}

#[tokio::test]
async fn missing_identity_refuses_to_start() {
    let rig = Rig {
        identity: AttemptIdentity::new("se-42", "  ", "Ada Lovelace", "CS-1815"),
        ..Rig::new()
    };
    let mut engine = rig.engine();
    assert!(matches!(
        engine.start(at(0)).await,
        Err(VigilError::MissingIdentity)
    ));
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(rig.devices.log().acquisitions, 0);
}

#[tokio::test]
async fn lock_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil-state.json");

    let first = Rig {
        store: Arc::new(JsonFileStore::open(&path).unwrap()),
        ..Rig::new().max_violations(2)
    };
    let mut engine = first.started().await;
    engine.report_tab_switch("Tab switched or hidden", at(0)).await;
    let outcome = engine.report_tab_switch("Tab switched or hidden", at(8000)).await;
    assert!(outcome.is_locked());
    drop(engine);

    let second = Rig {
        store: Arc::new(JsonFileStore::open(&path).unwrap()),
        ..Rig::new()
    };
    let mut engine = second.engine();
    assert!(engine.pipeline().is_locked());
    assert_eq!(engine.pipeline().ledger().count(ViolationType::TabSwitch), 2);
    assert!(engine.start(at(0)).await.is_err());
    assert_eq!(second.devices.log().acquisitions, 0);
}

#[tokio::test]
async fn denied_camera_degrades_and_still_escalates() {
    let rig = Rig {
        devices: FakeDevices::denied(),
        ..Rig::new()
    };
    let mut engine = rig.started().await;

    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.session().state(), SessionState::Error);
    assert_eq!(rig.bus.count(events::CAMERA_OFF), 1);
    assert!(engine.degradation().is_degraded(components::CAMERA));

    let outcome = engine.tick(at(5000)).await;
    assert_eq!(alert_types(&outcome), vec![ViolationType::NoFace]);
    assert_eq!(rig.faces.calls(), 0);
    assert!(engine.degradation().is_degraded(components::AUDIO_ANALYSER));
}

#[tokio::test]
async fn detector_failure_counts_as_no_detections() {
    let rig = Rig::new();
    rig.faces.set_fallback(vec![centered_face(), centered_face()]);
    rig.faces.push(Err(DetectorError::Failed {
        detector: "face_mesh".to_string(),
        reason: "wasm trap".to_string(),
    }));
    let mut engine = rig.started().await;

    let TickOutcome::Evaluated { signals, alerts } = engine.tick(at(100)).await else {
        panic!("expected evaluation");
    };
    assert_eq!(signals.face_count, 0);
    assert!(alerts.is_empty());
    assert!(engine.degradation().is_degraded(components::FACE_DETECTOR));

    let outcome = engine.tick(at(200)).await;
    assert_eq!(alert_types(&outcome), vec![ViolationType::MultipleFaces]);
    assert!(!engine.degradation().is_degraded(components::FACE_DETECTOR));
}

#[tokio::test(start_paused = true)]
async fn slow_detector_times_out() {
    let rig = Rig {
        faces: ScriptedDetector::always("face_mesh", vec![centered_face(), centered_face()])
            .with_delay(Duration::from_millis(2500)),
        ..Rig::new()
    };
    let mut engine = rig.started().await;

    let TickOutcome::Evaluated { signals, .. } = engine.tick(at(100)).await else {
        panic!("expected evaluation");
    };
    assert_eq!(signals.face_count, 0);
    let failure = &engine.degradation().active_degradations()[0].event;
    assert_eq!(failure.component, components::FACE_DETECTOR);
    assert!(failure.failure.contains("timed out"));
}

#[tokio::test]
async fn join_exam_is_announced_on_start() {
    let rig = Rig::new();
    let _engine = rig.started().await;
    assert_eq!(
        rig.bus.published_on(events::JOIN_EXAM),
        vec![json!({
            "email": "ada@example.edu",
            "studentExamId": "se-42",
            "name": "Ada Lovelace",
            "rollNumber": "CS-1815"
        })]
    );
    assert_eq!(rig.bus.event_names()[0], events::JOIN_EXAM);
}

#[tokio::test]
async fn tab_switch_counts_but_unload_does_not() {
    let rig = Rig::new();
    let mut engine = rig.started().await;

    let outcome = engine
        .report_tab_switch("Window minimized or lost focus", at(1000))
        .await;
    assert!(matches!(outcome, PipelineOutcome::Alerted { count: 1, .. }));
    engine.notify_unload(at(2000));

    let published = rig.bus.published_on("tab_switch");
    assert_eq!(published.len(), 2);
    assert_eq!(published[1]["issue"], "Close/refresh");
    assert_eq!(engine.pipeline().ledger().count(ViolationType::TabSwitch), 1);
}

#[tokio::test]
async fn submit_exam_tears_down_and_leaves() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    engine.submit_exam().await.unwrap();

    assert_eq!(engine.state(), EngineState::Submitted);
    assert_eq!(
        rig.bus.published_on(events::SUBMIT_EXAM),
        vec![json!({"email": "ada@example.edu", "studentExamId": "se-42"})]
    );
    assert_eq!(rig.navigator.exits(), vec![ExitReason::Submitted]);
    assert_eq!(engine.session().state(), SessionState::TornDown);
    assert_eq!(engine.tick(at(1000)).await, TickOutcome::Skipped);
}

#[tokio::test]
async fn failed_submission_keeps_monitoring() {
    let rig = Rig {
        submitter: RecordingSubmitter::failing(),
        ..Rig::new()
    };
    let mut engine = rig.started().await;
    let err = engine.submit_exam().await.unwrap_err();
    assert!(matches!(err, VigilError::SubmissionError(_)));
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(rig.bus.count(events::SUBMIT_EXAM), 0);
    assert!(rig.navigator.exits().is_empty());
}

#[tokio::test]
async fn microphone_toggle_is_published() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    assert!(engine.set_microphone(false, at(1500)));
    assert_eq!(rig.devices.log().audio_enabled, Some(false));
    let toggled = rig.bus.published_on(events::MIC_TOGGLED);
    assert_eq!(toggled[0]["enabled"], false);
    assert_eq!(toggled[0]["timestamp"], "2024-05-01T10:00:01.500Z");
}

#[tokio::test]
async fn tick_flushes_signaling() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    rig.connector.gather("candidate:host");
    rig.bus.deliver(
        events::WEBRTC_ANSWER,
        json!({"answer": {"type": "answer", "sdp": "v=0"}, "studentExamId": "se-42"}),
    );
    engine.tick(at(100)).await;
    assert_eq!(engine.session().state(), SessionState::Streaming);
    assert_eq!(rig.bus.count(events::WEBRTC_CANDIDATE), 1);
}

#[tokio::test]
async fn teardown_is_idempotent_and_stops_ticks() {
    let rig = Rig::new();
    let mut engine = rig.started().await;
    engine.teardown();
    engine.teardown();
    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(rig.devices.log().stops, 1);
    assert_eq!(engine.tick(at(6000)).await, TickOutcome::Skipped);
    assert!(rig.navigator.exits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_loop_locks_on_sustained_absence() {
    let rig = Rig::new().max_violations(1);
    let mut engine = rig.engine();

    let state = engine.run().await.unwrap();
    assert_eq!(state, EngineState::Locked);
    assert!(engine.ticks() > 100);
    assert_eq!(rig.bus.count("eye_off"), 1);
    assert_eq!(rig.submitter.calls().len(), 1);
    assert_eq!(rig.navigator.exits(), vec![ExitReason::Locked]);
}

#[tokio::test(start_paused = true)]
async fn run_loop_applies_signals_and_stops_from_handle() {
    let rig = Rig::new();
    rig.faces.set_fallback(vec![centered_face()]);
    let mut engine = rig.engine();
    let handle = engine.handle();

    let bus = rig.bus.clone();
    let remote = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        bus.deliver(
            events::WEBRTC_ANSWER,
            json!({"answer": {"type": "answer", "sdp": "v=0"}, "studentExamId": "se-42"}),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.stop();
    };
    let (result, ()) = tokio::join!(engine.run(), remote);

    assert_eq!(result.unwrap(), EngineState::Stopped);
    assert_eq!(rig.connector.log().remote_descriptions.len(), 1);
    assert_eq!(engine.session().state(), SessionState::TornDown);
    assert!(rig.bus.published_on("eye_off").is_empty());
    assert!(rig.navigator.exits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_answer_does_not_stall_sampling() {
    let rig = Rig {
        connector: FakeConnector::new().with_answer_delay(Duration::from_secs(5)),
        ..Rig::new()
    };
    rig.faces.set_fallback(vec![centered_face()]);
    let mut engine = rig.engine();
    let handle = engine.handle();

    let bus = rig.bus.clone();
    let remote = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        bus.deliver(
            events::WEBRTC_ANSWER,
            json!({"answer": {"type": "answer", "sdp": "v=0"}, "studentExamId": "se-42"}),
        );
        tokio::time::sleep(Duration::from_millis(3000)).await;
        handle.stop();
    };
    let (result, ()) = tokio::join!(engine.run(), remote);

    assert_eq!(result.unwrap(), EngineState::Stopped);
    // ~3.1s at a 33ms cadence.
    assert!(engine.ticks() > 80, "only {} ticks", engine.ticks());
    assert!(rig.connector.log().remote_descriptions.is_empty());
    assert_eq!(engine.session().state(), SessionState::TornDown);
}

#[tokio::test(start_paused = true)]
async fn lock_while_answer_in_flight_discards_the_answer() {
    let rig = Rig {
        connector: FakeConnector::new().with_answer_delay(Duration::from_secs(10)),
        ..Rig::new().max_violations(1)
    };
    let mut engine = rig.engine();

    let bus = rig.bus.clone();
    let remote = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        bus.deliver(
            events::WEBRTC_ANSWER,
            json!({"answer": {"type": "answer", "sdp": "v=0"}, "studentExamId": "se-42"}),
        );
    };
    let (result, ()) = tokio::join!(engine.run(), remote);

    assert_eq!(result.unwrap(), EngineState::Locked);
    assert!(!engine.session().is_busy());
    assert_eq!(engine.session().state(), SessionState::TornDown);
    assert_eq!(rig.connector.log().closed, 1);

    let ticks = engine.ticks();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(engine.tick(at(20_000)).await, TickOutcome::Skipped);
    assert_eq!(engine.ticks(), ticks);
    assert!(rig.connector.log().remote_descriptions.is_empty());
    assert_eq!(rig.submitter.calls().len(), 1);
    assert_eq!(rig.navigator.exits(), vec![ExitReason::Locked]);
}

#[tokio::test]
async fn invalid_config_is_rejected_before_start() {
    let mut rig = Rig::new();
    rig.config.capture.frame_interval_ms = 0;
    let mut engine = rig.engine();

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, VigilError::ConfigError(_)));
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(rig.bus.published().is_empty());
    assert_eq!(rig.devices.log().acquisitions, 0);
}

#[tokio::test]
async fn run_refuses_locked_attempt() {
    let rig = Rig::new();
    rig.store.set("exam_locked", "true").unwrap();
    let mut engine = rig.engine();
    assert!(matches!(
        engine.run().await,
        Err(VigilError::SessionLocked { .. })
    ));
}
