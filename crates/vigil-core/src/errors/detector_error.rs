/// Errors raised by the external face / hand landmark detectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectorError {
    #[error("detector {detector} failed: {reason}")]
    Failed { detector: String, reason: String },

    #[error("detector {detector} timed out after {timeout_ms}ms")]
    Timeout { detector: String, timeout_ms: u64 },
}
