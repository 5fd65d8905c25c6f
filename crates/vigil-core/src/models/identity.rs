use serde::{Deserialize, Serialize};

/// Who is taking which attempt. Must be known before sampling may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptIdentity {
    pub student_exam_id: String,
    pub user_email: String,
    pub user_name: String,
    pub user_roll_number: String,
}

impl AttemptIdentity {
    pub fn new(
        student_exam_id: impl Into<String>,
        user_email: impl Into<String>,
        user_name: impl Into<String>,
        user_roll_number: impl Into<String>,
    ) -> Self {
        Self {
            student_exam_id: student_exam_id.into(),
            user_email: user_email.into(),
            user_name: user_name.into(),
            user_roll_number: user_roll_number.into(),
        }
    }

    /// Sampling needs at least the attempt id and the user's email.
    pub fn is_complete(&self) -> bool {
        !self.student_exam_id.trim().is_empty() && !self.user_email.trim().is_empty()
    }
}
