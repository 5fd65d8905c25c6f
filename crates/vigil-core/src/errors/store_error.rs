/// Resilience Store errors. Never fatal to the monitoring pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}
