use crate::errors::SubmissionError;

/// Exam submission collaborator. Safe to call once per lock event.
#[allow(async_fn_in_trait)]
pub trait IExamSubmitter {
    async fn submit(&self, student_exam_id: &str) -> Result<(), SubmissionError>;
}
