//! Typed inbound signaling messages.

use vigil_core::constants::events;
use vigil_core::errors::SignalingError;
use vigil_core::models::payloads::{AnswerPayload, CandidatePayload, RequestOfferPayload};

/// A message from the remote observer, addressed to one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalMessage {
    Answer(AnswerPayload),
    Candidate(CandidatePayload),
    RequestOffer(RequestOfferPayload),
}

impl SignalMessage {
    /// Parse a bus payload received on `event`.
    pub fn parse(event: &str, payload: &serde_json::Value) -> Result<Self, SignalingError> {
        let malformed = |e: serde_json::Error| SignalingError::MalformedMessage {
            event: event.to_string(),
            reason: e.to_string(),
        };
        match event {
            events::WEBRTC_ANSWER => serde_json::from_value::<AnswerPayload>(payload.clone())
                .map(SignalMessage::Answer)
                .map_err(malformed),
            events::WEBRTC_CANDIDATE => serde_json::from_value::<CandidatePayload>(payload.clone())
                .map(SignalMessage::Candidate)
                .map_err(malformed),
            events::REQUEST_OFFER => serde_json::from_value::<RequestOfferPayload>(payload.clone())
                .map(SignalMessage::RequestOffer)
                .map_err(malformed),
            other => Err(SignalingError::MalformedMessage {
                event: other.to_string(),
                reason: "not a signaling event".to_string(),
            }),
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            SignalMessage::Answer(_) => events::WEBRTC_ANSWER,
            SignalMessage::Candidate(_) => events::WEBRTC_CANDIDATE,
            SignalMessage::RequestOffer(_) => events::REQUEST_OFFER,
        }
    }

    /// True for a candidate this client published itself. Outbound
    /// candidates carry the sender's identity; the observer's do not.
    pub fn is_self_originated(&self) -> bool {
        match self {
            SignalMessage::Candidate(p) => p.name.is_some() || p.roll_number.is_some(),
            _ => false,
        }
    }

    /// Attempt the message is addressed to.
    pub fn student_exam_id(&self) -> &str {
        match self {
            SignalMessage::Answer(p) => &p.student_exam_id,
            SignalMessage::Candidate(p) => &p.student_exam_id,
            SignalMessage::RequestOffer(p) => &p.student_exam_id,
        }
    }
}
