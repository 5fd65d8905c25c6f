use super::{
    AcquisitionError, ConfigError, DetectorError, SignalingError, StoreError, SubmissionError,
};

/// Umbrella error for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("media acquisition error: {0}")]
    AcquisitionError(#[from] AcquisitionError),

    #[error("detector error: {0}")]
    DetectorError(#[from] DetectorError),

    #[error("signaling error: {0}")]
    SignalingError(#[from] SignalingError),

    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("submission error: {0}")]
    SubmissionError(#[from] SubmissionError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("attempt identity not available")]
    MissingIdentity,

    #[error("attempt {attempt_id} is locked")]
    SessionLocked { attempt_id: String },
}

/// Convenience alias used across the workspace.
pub type VigilResult<T> = Result<T, VigilError>;
