use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Options handed to the external face and hand landmark detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    pub max_num_faces: u32,
    pub max_num_hands: u32,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub model_complexity: u8,
    /// Upper bound for a single detector call; a timeout counts as no detections.
    pub timeout_ms: u64,
}

impl DetectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_num_faces: defaults::DEFAULT_MAX_NUM_FACES,
            max_num_hands: defaults::DEFAULT_MAX_NUM_HANDS,
            refine_landmarks: true,
            min_detection_confidence: defaults::DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: defaults::DEFAULT_MIN_TRACKING_CONFIDENCE,
            model_complexity: defaults::DEFAULT_MODEL_COMPLEXITY,
            timeout_ms: defaults::DEFAULT_DETECTOR_TIMEOUT_MS,
        }
    }
}
