use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized landmark point in [0,1] image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// All landmarks a detector reports for one face or one hand.
pub type LandmarkSet = Vec<Landmark>;

/// Everything observed during one sampling tick. Discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationFrame {
    pub faces: Vec<LandmarkSet>,
    pub hands: Vec<LandmarkSet>,
    /// Root-mean-square level of the centered audio buffer, in [0,1].
    pub audio_rms: f64,
    pub captured_at: DateTime<Utc>,
}

impl ObservationFrame {
    /// A frame with no detections and silence.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            faces: Vec::new(),
            hands: Vec::new(),
            audio_rms: 0.0,
            captured_at,
        }
    }

    /// The face obstruction is judged against.
    pub fn primary_face(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }
}
