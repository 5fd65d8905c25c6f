use chrono::{DateTime, Duration, TimeZone, Utc};
use vigil_core::config::MonitorConfig;
use vigil_core::models::{Landmark, LandmarkSet, ObservationFrame, ViolationType};
use vigil_detection::{iou, BoundingBox, ConditionEvaluator};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn at(ms: i64) -> DateTime<Utc> {
    t0() + Duration::milliseconds(ms)
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> LandmarkSet {
    vec![
        Landmark::new(x0, y0),
        Landmark::new(x1, y0),
        Landmark::new(x0, y1),
        Landmark::new(x1, y1),
    ]
}

fn frame(ms: i64, faces: Vec<LandmarkSet>, hands: Vec<LandmarkSet>, audio_rms: f64) -> ObservationFrame {
    ObservationFrame {
        faces,
        hands,
        audio_rms,
        captured_at: at(ms),
    }
}

// ── No face ──────────────────────────────────────────────────────────────

#[test]
fn no_face_turns_true_only_after_timeout() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());

    for ms in [0, 1000, 2000, 3000, 4000] {
        let s = eval.evaluate(&frame(ms, vec![], vec![], 0.0));
        assert!(!s.no_face, "no_face must stay false at {ms}ms");
    }
    let s = eval.evaluate(&frame(4999, vec![], vec![], 0.0));
    assert!(!s.no_face);
    let s = eval.evaluate(&frame(5000, vec![], vec![], 0.0));
    assert!(s.no_face, "no_face must be true at exactly the timeout");
    assert_eq!(s.face_absent_ms, 5000);
}

#[test]
fn no_face_resets_on_the_tick_a_face_reappears() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    assert!(eval.evaluate(&frame(6000, vec![], vec![], 0.0)).no_face);

    let s = eval.evaluate(&frame(6100, vec![rect(0.3, 0.3, 0.6, 0.6)], vec![], 0.0));
    assert!(!s.no_face);
    assert_eq!(eval.last_face_seen_at(), at(6100));

    // Absence is measured again from the reappearance.
    assert!(!eval.evaluate(&frame(11_000, vec![], vec![], 0.0)).no_face);
    assert!(eval.evaluate(&frame(11_100, vec![], vec![], 0.0)).no_face);
}

#[test]
fn empty_tick_does_not_panic() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let s = eval.evaluate(&ObservationFrame::empty(t0()));
    assert!(!s.multiple_faces);
    assert!(!s.hand_obstruction);
    assert!(!s.loud_voice);
}

// ── Multiple faces ───────────────────────────────────────────────────────

#[test]
fn multiple_faces_is_per_tick() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let two = vec![rect(0.1, 0.1, 0.3, 0.3), rect(0.6, 0.6, 0.8, 0.8)];
    let s = eval.evaluate(&frame(0, two, vec![], 0.0));
    assert!(s.multiple_faces);
    assert_eq!(s.face_count, 2);

    let s = eval.evaluate(&frame(33, vec![rect(0.1, 0.1, 0.3, 0.3)], vec![], 0.0));
    assert!(!s.multiple_faces);
}

// ── Hand obstruction ─────────────────────────────────────────────────────

#[test]
fn hand_over_face_is_obstruction() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let face = rect(0.3, 0.3, 0.7, 0.7);
    let hand = rect(0.35, 0.35, 0.65, 0.65);
    let s = eval.evaluate(&frame(0, vec![face], vec![hand], 0.0));
    assert!(s.hand_obstruction);
}

#[test]
fn hand_without_face_is_never_obstruction() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let s = eval.evaluate(&frame(0, vec![], vec![rect(0.3, 0.3, 0.7, 0.7)], 0.0));
    assert!(!s.hand_obstruction);
}

#[test]
fn obstruction_threshold_is_strict() {
    let face = rect(0.2, 0.2, 0.7, 0.7);
    let hand = rect(0.2, 0.2, 0.4, 0.5);
    let exact = iou(
        Some(&BoundingBox::from_landmarks(&face)),
        Some(&BoundingBox::from_landmarks(&hand)),
    );
    assert!(exact > 0.0);

    let at_threshold = MonitorConfig {
        obstruction_iou_threshold: exact,
        ..MonitorConfig::default()
    };
    let mut eval = ConditionEvaluator::new(&at_threshold, t0());
    let s = eval.evaluate(&frame(0, vec![face.clone()], vec![hand.clone()], 0.0));
    assert!(!s.hand_obstruction, "IoU equal to the threshold must not count");

    let just_below = MonitorConfig {
        obstruction_iou_threshold: exact - 1e-9,
        ..MonitorConfig::default()
    };
    let mut eval = ConditionEvaluator::new(&just_below, t0());
    let s = eval.evaluate(&frame(0, vec![face], vec![hand], 0.0));
    assert!(s.hand_obstruction, "IoU just above the threshold must count");
}

#[test]
fn only_the_primary_face_is_checked() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let primary = rect(0.0, 0.0, 0.2, 0.2);
    let second = rect(0.6, 0.6, 0.9, 0.9);
    let hand = rect(0.6, 0.6, 0.9, 0.9);
    let s = eval.evaluate(&frame(0, vec![primary, second], vec![hand], 0.0));
    assert!(!s.hand_obstruction);
    assert!(s.multiple_faces);
}

// ── Audio ────────────────────────────────────────────────────────────────

#[test]
fn loud_voice_uses_strict_threshold() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let face = || vec![rect(0.3, 0.3, 0.6, 0.6)];
    assert!(!eval.evaluate(&frame(0, face(), vec![], 0.12)).loud_voice);
    assert!(eval.evaluate(&frame(10, face(), vec![], 0.13)).loud_voice);
}

#[test]
fn loud_audio_with_absent_face_sets_both_signals() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let s = eval.evaluate(&frame(2500, vec![], vec![], 0.20));
    assert!(s.loud_voice);
    assert!(s.voice_without_face);
    assert!(!s.no_face);
}

#[test]
fn voice_without_face_needs_more_than_grace_period() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let s = eval.evaluate(&frame(2000, vec![], vec![], 0.5));
    assert!(s.loud_voice);
    assert!(!s.voice_without_face, "exactly the grace period is not enough");

    let s = eval.evaluate(&frame(2001, vec![], vec![], 0.5));
    assert!(s.voice_without_face);
}

// ── Conditions ───────────────────────────────────────────────────────────

#[test]
fn conditions_follow_fixed_order_with_issue_texts() {
    let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), t0());
    let two = vec![rect(0.1, 0.1, 0.3, 0.3), rect(0.6, 0.6, 0.8, 0.8)];
    let signals = eval.evaluate(&frame(0, two, vec![], 0.0));
    let conditions = eval.conditions(&signals);

    let order: Vec<ViolationType> = conditions.iter().map(|c| c.violation).collect();
    assert_eq!(order, ViolationType::SAMPLED.to_vec());
    assert_eq!(conditions[0].issue, "No face detected for 5s");
    assert_eq!(conditions[1].issue, "2 faces detected");
    assert!(conditions[1].active);
    assert!(!conditions[0].active);
}
