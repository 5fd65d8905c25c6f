use crate::config::SignalingConfig;
use crate::errors::SignalingError;
use crate::models::{IceCandidate, MediaTrack, SessionDescription};

/// One WebRTC-style peer connection towards the remote observer.
#[allow(async_fn_in_trait)]
pub trait IPeerConnection {
    fn add_track(&mut self, track: &MediaTrack) -> Result<(), SignalingError>;

    /// Ids of the tracks currently attached to senders.
    fn sender_track_ids(&self) -> Vec<String>;

    async fn create_offer(&mut self) -> Result<SessionDescription, SignalingError>;
    async fn set_local_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), SignalingError>;
    async fn set_remote_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), SignalingError>;
    async fn add_ice_candidate(&mut self, candidate: IceCandidate) -> Result<(), SignalingError>;

    /// Local ICE candidates gathered since the last call.
    fn take_local_candidates(&mut self) -> Vec<IceCandidate>;

    /// Close the connection. Must be idempotent.
    fn close(&mut self);
}

/// Creates peer connections. A connection outlives any single call, so
/// negotiation can run alongside sampling.
pub trait IPeerConnector {
    type Peer: IPeerConnection + 'static;

    fn connect(&self, config: &SignalingConfig) -> Result<Self::Peer, SignalingError>;
}
