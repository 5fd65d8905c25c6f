pub mod tracker;

pub use tracker::{DegradationTracker, RecoveryStatus, TrackedDegradation};

/// Component names used when recording degradations.
pub mod components {
    pub const CAMERA: &str = "camera";
    pub const AUDIO_ANALYSER: &str = "audio_analyser";
    pub const FACE_DETECTOR: &str = "face_detector";
    pub const HAND_DETECTOR: &str = "hand_detector";
    pub const PEER_CONNECTION: &str = "peer_connection";
    pub const STORE: &str = "store";
}
