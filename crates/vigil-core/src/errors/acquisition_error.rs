/// Camera / microphone acquisition errors. Recoverable only by user action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcquisitionError {
    #[error("permission denied for {device}")]
    PermissionDenied { device: String },

    #[error("capture device unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    #[error("capture constraints not satisfiable: {reason}")]
    ConstraintsUnsatisfied { reason: String },
}
