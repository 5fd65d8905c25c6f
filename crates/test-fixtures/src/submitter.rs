use std::sync::{Arc, Mutex};

use vigil_core::errors::SubmissionError;
use vigil_core::traits::IExamSubmitter;

/// Records each submission; optionally fails every call.
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl IExamSubmitter for RecordingSubmitter {
    async fn submit(&self, student_exam_id: &str) -> Result<(), SubmissionError> {
        self.calls.lock().unwrap().push(student_exam_id.to_string());
        if self.fail {
            return Err(SubmissionError::Network {
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}
