//! ConditionEvaluator: one observation in, five boolean signals out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::config::MonitorConfig;
use vigil_core::models::{ObservationFrame, ViolationType};

use crate::geometry::{iou, BoundingBox};

/// Signals computed for one tick. No debouncing happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSignals {
    pub no_face: bool,
    pub multiple_faces: bool,
    pub hand_obstruction: bool,
    pub loud_voice: bool,
    pub voice_without_face: bool,
    pub face_count: usize,
    pub hand_count: usize,
    pub audio_rms: f64,
    /// Time since a face was last seen, as of this tick.
    pub face_absent_ms: i64,
}

impl ConditionSignals {
    pub fn is_set(&self, violation: ViolationType) -> bool {
        match violation {
            ViolationType::NoFace => self.no_face,
            ViolationType::MultipleFaces => self.multiple_faces,
            ViolationType::HandObstruction => self.hand_obstruction,
            ViolationType::LoudVoice => self.loud_voice,
            ViolationType::VoiceNoFace => self.voice_without_face,
            ViolationType::TabSwitch => false,
        }
    }
}

/// One signal ready for the emitter, with its human-readable issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub violation: ViolationType,
    pub active: bool,
    pub issue: String,
}

/// Evaluates observation frames. Carries only the last face sighting.
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    no_face_timeout: Duration,
    voice_no_face_grace: Duration,
    obstruction_iou_threshold: f64,
    audio_rms_threshold: f64,
    last_face_seen_at: DateTime<Utc>,
}

impl ConditionEvaluator {
    /// `started_at` counts as the last face sighting, so absence is measured
    /// from the start of monitoring.
    pub fn new(config: &MonitorConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            no_face_timeout: config.no_face_timeout(),
            voice_no_face_grace: config.voice_no_face_grace(),
            obstruction_iou_threshold: config.obstruction_iou_threshold,
            audio_rms_threshold: config.audio_rms_threshold,
            last_face_seen_at: started_at,
        }
    }

    pub fn last_face_seen_at(&self) -> DateTime<Utc> {
        self.last_face_seen_at
    }

    /// Restart absence tracking, e.g. when monitoring restarts.
    pub fn reset(&mut self, at: DateTime<Utc>) {
        self.last_face_seen_at = at;
    }

    pub fn evaluate(&mut self, frame: &ObservationFrame) -> ConditionSignals {
        let now = frame.captured_at;
        if !frame.faces.is_empty() {
            self.last_face_seen_at = now;
        }
        let absent_for = now - self.last_face_seen_at;

        let no_face = absent_for >= self.no_face_timeout;
        let multiple_faces = frame.faces.len() > 1;
        let hand_obstruction = self.hand_obstructs_face(frame);
        let loud_voice = frame.audio_rms > self.audio_rms_threshold;
        let voice_without_face = loud_voice && absent_for > self.voice_no_face_grace;

        ConditionSignals {
            no_face,
            multiple_faces,
            hand_obstruction,
            loud_voice,
            voice_without_face,
            face_count: frame.faces.len(),
            hand_count: frame.hands.len(),
            audio_rms: frame.audio_rms,
            face_absent_ms: absent_for.num_milliseconds(),
        }
    }

    /// The signals in emitter order, each with its issue text.
    pub fn conditions(&self, signals: &ConditionSignals) -> [Condition; 5] {
        let timeout_secs = self.no_face_timeout.num_milliseconds() as f64 / 1000.0;
        ViolationType::SAMPLED.map(|violation| Condition {
            violation,
            active: signals.is_set(violation),
            issue: match violation {
                ViolationType::NoFace => format!("No face detected for {timeout_secs}s"),
                ViolationType::MultipleFaces => format!("{} faces detected", signals.face_count),
                ViolationType::HandObstruction => "Hand obstructing the face".to_string(),
                ViolationType::LoudVoice => "Abnormal voice/background music detected".to_string(),
                ViolationType::VoiceNoFace => "Speech detected but face not visible".to_string(),
                ViolationType::TabSwitch => String::new(),
            },
        })
    }

    fn hand_obstructs_face(&self, frame: &ObservationFrame) -> bool {
        let Some(face) = frame.primary_face() else {
            return false;
        };
        let face_box = BoundingBox::from_landmarks(face);
        frame.hands.iter().any(|hand| {
            let hand_box = BoundingBox::from_landmarks(hand);
            iou(Some(&face_box), Some(&hand_box)) > self.obstruction_iou_threshold
        })
    }
}
