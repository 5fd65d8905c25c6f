use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds for condition evaluation, debouncing, and escalation.
///
/// Keys are camelCase so hosts can pass the same option names they already use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Continuous face absence required before `noFace` turns true.
    pub no_face_timeout_ms: u64,
    /// Hand/face IoU above which the face counts as obstructed.
    pub obstruction_iou_threshold: f64,
    /// Audio RMS level above which the room counts as loud.
    pub audio_rms_threshold: f64,
    /// Face absence after which loud audio also counts as voice without face.
    pub voice_no_face_grace_ms: u64,
    /// Minimum spacing between two alerts of the same type.
    pub cooldown_ms: u64,
    /// Per-type count that locks the attempt.
    pub max_violations_before_lock: u32,
    /// Entries kept in the recent-alert log.
    pub recent_alert_capacity: usize,
}

impl MonitorConfig {
    pub fn no_face_timeout(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.no_face_timeout_ms as i64)
    }

    pub fn voice_no_face_grace(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.voice_no_face_grace_ms as i64)
    }

    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.cooldown_ms as i64)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            no_face_timeout_ms: defaults::DEFAULT_NO_FACE_TIMEOUT_MS,
            obstruction_iou_threshold: defaults::DEFAULT_OBSTRUCTION_IOU_THRESHOLD,
            audio_rms_threshold: defaults::DEFAULT_AUDIO_RMS_THRESHOLD,
            voice_no_face_grace_ms: defaults::DEFAULT_VOICE_NO_FACE_GRACE_MS,
            cooldown_ms: defaults::DEFAULT_COOLDOWN_MS,
            max_violations_before_lock: defaults::DEFAULT_MAX_VIOLATIONS_BEFORE_LOCK,
            recent_alert_capacity: defaults::DEFAULT_RECENT_ALERT_CAPACITY,
        }
    }
}
