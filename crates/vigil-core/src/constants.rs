/// Vigil system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resilience Store key holding the JSON ledger object.
pub const STORE_KEY_ALERT_COUNTS: &str = "exam_alert_counts";

/// Resilience Store key holding the lock flag (`"true"` / `"false"`).
pub const STORE_KEY_LOCKED: &str = "exam_locked";

/// Message bus event names that are not violation types.
pub mod events {
    pub const WEBRTC_OFFER: &str = "webrtc_offer";
    pub const WEBRTC_ANSWER: &str = "webrtc_answer";
    pub const WEBRTC_CANDIDATE: &str = "webrtc_candidate";
    pub const REQUEST_OFFER: &str = "request_offer";
    pub const AUTO_SUBMIT: &str = "auto_submit";
    pub const CAMERA_OFF: &str = "camera_off";
    pub const JOIN_EXAM: &str = "join_exam";
    pub const SUBMIT_EXAM: &str = "submit_exam";
    pub const MIC_TOGGLED: &str = "mic_toggled";

    /// Inbound events the streaming session listens on.
    pub const SIGNALING_INBOUND: [&str; 3] = [WEBRTC_ANSWER, WEBRTC_CANDIDATE, REQUEST_OFFER];
}

/// Issue text for the uncounted close/refresh notice.
pub const UNLOAD_ISSUE: &str = "Close/refresh";
