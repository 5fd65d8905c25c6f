//! Property tests for debouncing and counting.

use std::sync::Arc;

use proptest::prelude::*;
use test_fixtures::{at, identity, RecordingBus, RecordingSink, RecordingSubmitter};
use vigil_core::config::MonitorConfig;
use vigil_core::models::ViolationType;
use vigil_escalation::{AlertPipeline, DebouncedAlertEmitter, PipelineOutcome};
use vigil_store::{EscalationStore, MemoryStore};

fn violation() -> impl Strategy<Value = ViolationType> {
    prop::sample::select(ViolationType::ALL.to_vec())
}

proptest! {
    #[test]
    fn two_events_closer_than_cooldown_emit_once(
        violation in violation(),
        start in 0i64..100_000,
        gap in 0i64..8000,
    ) {
        let mut emitter = DebouncedAlertEmitter::new(chrono::Duration::milliseconds(8000));
        let first = emitter.evaluate(violation, true, "issue", at(start));
        let second = emitter.evaluate(violation, true, "issue", at(start + gap));
        prop_assert!(first.is_some());
        prop_assert!(second.is_none());
    }

    #[test]
    fn events_spaced_by_cooldown_each_emit(
        violation in violation(),
        gaps in prop::collection::vec(8000i64..20_000, 1..10),
    ) {
        let mut emitter = DebouncedAlertEmitter::new(chrono::Duration::milliseconds(8000));
        let mut t = 0;
        prop_assert!(emitter.evaluate(violation, true, "issue", at(t)).is_some());
        for gap in gaps {
            // The condition clears between occurrences.
            emitter.evaluate(violation, false, "issue", at(t + 1));
            t += gap;
            prop_assert!(emitter.evaluate(violation, true, "issue", at(t)).is_some());
        }
    }

    #[test]
    fn ledger_matches_emitted_alerts(
        steps in prop::collection::vec((violation(), any::<bool>(), 0i64..6000), 1..60),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let bus = RecordingBus::new();
        let config = MonitorConfig {
            max_violations_before_lock: u32::MAX,
            ..MonitorConfig::default()
        };
        let mut pipeline = AlertPipeline::new(
            identity(),
            &config,
            EscalationStore::new(Arc::new(MemoryStore::new())),
            Arc::new(bus.clone()),
            Arc::new(RecordingSink::new()),
            RecordingSubmitter::new(),
        );
        let mut t = 0;
        runtime.block_on(async {
            for (violation, condition, gap) in &steps {
                t += gap;
                let outcome = pipeline.process(*violation, *condition, "issue", at(t)).await;
                prop_assert!(!matches!(outcome, PipelineOutcome::Locked(_)));
            }
            Ok(())
        })?;
        for violation in ViolationType::ALL {
            prop_assert_eq!(
                pipeline.ledger().count(violation) as usize,
                bus.count(violation.event_name())
            );
        }
    }
}
