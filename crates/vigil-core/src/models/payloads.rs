//! Message bus payloads, shaped the way the observer side reads them.

use serde::{Deserialize, Serialize};

use super::{IceCandidate, SessionDescription, ViolationType};

/// Published on the violation's own event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub student_exam_id: String,
    pub email: String,
    pub issue: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSubmitPayload {
    pub student_exam_id: String,
    pub email: String,
    pub reason: ViolationType,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraOffPayload {
    pub student_exam_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinExamPayload {
    pub email: String,
    pub student_exam_id: String,
    pub name: String,
    pub roll_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamPayload {
    pub email: String,
    pub student_exam_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicToggledPayload {
    pub student_exam_id: String,
    pub email: String,
    pub enabled: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPayload {
    pub offer: SessionDescription,
    pub email: String,
    pub student_exam_id: String,
    pub name: String,
    pub roll_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub answer: SessionDescription,
    pub student_exam_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Used in both directions; the sender identity is only filled outbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    #[serde(default)]
    pub candidate: Option<IceCandidate>,
    pub student_exam_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOfferPayload {
    pub student_exam_id: String,
}
