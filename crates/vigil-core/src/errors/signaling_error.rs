/// Peer connection and signaling errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalingError {
    #[error("peer connection could not be created: {reason}")]
    PeerCreation { reason: String },

    #[error("negotiation failed during {step}: {reason}")]
    Negotiation { step: String, reason: String },

    #[error("malformed {event} message: {reason}")]
    MalformedMessage { event: String, reason: String },

    #[error("track {track_id} rejected: {reason}")]
    TrackRejected { track_id: String, reason: String },

    #[error("peer connection is closed")]
    Closed,
}
