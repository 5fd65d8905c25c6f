use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use vigil_core::config::MonitorConfig;
use vigil_core::models::{Landmark, ObservationFrame};
use vigil_detection::{iou, rms_level, BoundingBox, ConditionEvaluator};

fn landmark() -> impl Strategy<Value = Landmark> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(x, y)| Landmark::new(x, y))
}

fn bbox() -> impl Strategy<Value = BoundingBox> {
    prop::collection::vec(landmark(), 0..8).prop_map(|l| BoundingBox::from_landmarks(&l))
}

proptest! {
    #[test]
    fn iou_is_bounded_and_symmetric(a in bbox(), b in bbox()) {
        let ab = iou(Some(&a), Some(&b));
        let ba = iou(Some(&b), Some(&a));
        prop_assert!((0.0..=1.0 + 1e-9).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn rms_is_within_unit_range(samples in prop::collection::vec(any::<u8>(), 0..1024)) {
        let level = rms_level(&samples);
        prop_assert!((0.0..=1.0).contains(&level));
    }

    #[test]
    fn no_face_tracks_absence_duration(gaps in prop::collection::vec(1i64..3000, 1..20)) {
        let config = MonitorConfig::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut eval = ConditionEvaluator::new(&config, start);
        let mut elapsed = 0i64;
        for gap in gaps {
            elapsed += gap;
            let s = eval.evaluate(&ObservationFrame::empty(start + Duration::milliseconds(elapsed)));
            prop_assert_eq!(s.no_face, elapsed >= config.no_face_timeout_ms as i64);
        }
    }

    #[test]
    fn voice_without_face_implies_loud_voice(rms in 0.0f64..1.0, absent_ms in 0i64..10_000) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut eval = ConditionEvaluator::new(&MonitorConfig::default(), start);
        let mut frame = ObservationFrame::empty(start + Duration::milliseconds(absent_ms));
        frame.audio_rms = rms;
        let s = eval.evaluate(&frame);
        prop_assert!(!s.voice_without_face || s.loud_voice);
    }
}
