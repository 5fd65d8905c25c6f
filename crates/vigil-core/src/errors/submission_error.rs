/// Errors from the exam submission collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("submission rejected for attempt {attempt_id}: {reason}")]
    Rejected { attempt_id: String, reason: String },
}
