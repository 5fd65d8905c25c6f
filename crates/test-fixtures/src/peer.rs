use std::sync::{Arc, Mutex};
use std::time::Duration;

use vigil_core::config::SignalingConfig;
use vigil_core::errors::SignalingError;
use vigil_core::models::{IceCandidate, MediaTrack, SdpType, SessionDescription};
use vigil_core::traits::{IPeerConnection, IPeerConnector};

/// Everything the fake peer connection was asked to do.
#[derive(Debug, Default)]
pub struct PeerLog {
    pub connections: usize,
    pub added_tracks: Vec<String>,
    pub offers: usize,
    pub local_description: Option<SessionDescription>,
    pub remote_descriptions: Vec<SessionDescription>,
    pub remote_candidates: Vec<IceCandidate>,
    pub pending_local_candidates: Vec<IceCandidate>,
    pub closed: usize,
    pub reject_candidates: bool,
    pub fail_connect: bool,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    log: Arc<Mutex<PeerLog>>,
    answer_delay: Option<Duration>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applying a remote answer takes this long.
    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = Some(delay);
        self
    }

    pub fn failing() -> Self {
        let connector = Self::default();
        connector.log().fail_connect = true;
        connector
    }

    /// Queue a local ICE candidate as if the ICE agent gathered it.
    pub fn gather(&self, candidate: &str) {
        self.log().pending_local_candidates.push(IceCandidate {
            candidate: candidate.to_string(),
            sdp_mid: Some("0".to_string()),
            sdp_m_line_index: Some(0),
        });
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, PeerLog> {
        self.log.lock().unwrap()
    }
}

impl IPeerConnector for FakeConnector {
    type Peer = FakePeer;

    fn connect(&self, _config: &SignalingConfig) -> Result<FakePeer, SignalingError> {
        let mut log = self.log();
        if log.fail_connect {
            return Err(SignalingError::PeerCreation {
                reason: "no ICE servers reachable".to_string(),
            });
        }
        log.connections += 1;
        Ok(FakePeer {
            log: self.log.clone(),
            answer_delay: self.answer_delay,
            senders: Vec::new(),
            closed: false,
        })
    }
}

pub struct FakePeer {
    log: Arc<Mutex<PeerLog>>,
    answer_delay: Option<Duration>,
    senders: Vec<MediaTrack>,
    closed: bool,
}

impl FakePeer {
    fn ensure_open(&self) -> Result<(), SignalingError> {
        if self.closed {
            Err(SignalingError::Closed)
        } else {
            Ok(())
        }
    }
}

impl IPeerConnection for FakePeer {
    fn add_track(&mut self, track: &MediaTrack) -> Result<(), SignalingError> {
        self.ensure_open()?;
        if self.senders.iter().any(|t| t.id == track.id) {
            return Err(SignalingError::TrackRejected {
                track_id: track.id.clone(),
                reason: "already attached".to_string(),
            });
        }
        self.senders.push(track.clone());
        self.log.lock().unwrap().added_tracks.push(track.id.clone());
        Ok(())
    }

    fn sender_track_ids(&self) -> Vec<String> {
        self.senders.iter().map(|t| t.id.clone()).collect()
    }

    async fn create_offer(&mut self) -> Result<SessionDescription, SignalingError> {
        self.ensure_open()?;
        let mut log = self.log.lock().unwrap();
        log.offers += 1;
        Ok(SessionDescription {
            kind: SdpType::Offer,
            sdp: format!("v=0 offer-{}", log.offers),
        })
    }

    async fn set_local_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), SignalingError> {
        self.ensure_open()?;
        self.log.lock().unwrap().local_description = Some(desc);
        Ok(())
    }

    async fn set_remote_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), SignalingError> {
        if let Some(delay) = self.answer_delay {
            tokio::time::sleep(delay).await;
        }
        self.ensure_open()?;
        self.log.lock().unwrap().remote_descriptions.push(desc);
        Ok(())
    }

    async fn add_ice_candidate(&mut self, candidate: IceCandidate) -> Result<(), SignalingError> {
        self.ensure_open()?;
        let mut log = self.log.lock().unwrap();
        if log.reject_candidates {
            return Err(SignalingError::Negotiation {
                step: "addIceCandidate".to_string(),
                reason: "unknown ufrag".to_string(),
            });
        }
        log.remote_candidates.push(candidate);
        Ok(())
    }

    fn take_local_candidates(&mut self) -> Vec<IceCandidate> {
        std::mem::take(&mut self.log.lock().unwrap().pending_local_candidates)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.log.lock().unwrap().closed += 1;
        }
    }
}
