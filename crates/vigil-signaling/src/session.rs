//! StreamingSession: one peer connection per attempt, negotiated over the bus.
//!
//! ```text
//! UNINITIALIZED → ACQUIRING_MEDIA → CONNECTING → STREAMING → TORN_DOWN
//!                        └──────────────┴──→ ERROR
//! ```
//!
//! Inbound signaling arrives through bus subscriptions that only enqueue;
//! the owner drains the queue with [`StreamingSession::pump`] or
//! [`StreamingSession::next_step`] so every state change happens on the
//! owner's single thread of control.
//!
//! A message that needs the peer connection starts at most one in-flight
//! operation. Nothing waits for it: [`StreamingSession::pump`] polls it
//! once, and a driving loop can await [`StreamingSession::next_step`]
//! next to its other work. Results landing after teardown are dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, Mutex};
use vigil_core::config::{CaptureConfig, SignalingConfig};
use vigil_core::constants::events as wire;
use vigil_core::errors::{SignalingError, VigilResult};
use vigil_core::models::payloads::{CameraOffPayload, CandidatePayload, OfferPayload};
use vigil_core::models::{AttemptIdentity, MediaTrack, SdpType, SessionDescription, TrackKind};
use vigil_core::traits::{
    Cancellable, CancellationToken, IMediaDevices, IMediaStream, IMessageBus, IPeerConnection,
    IPeerConnector,
};
use vigil_observability::tracing_setup::events;

use crate::message::SignalMessage;

type SignalFuture = Pin<Box<dyn Future<Output = SignalCompletion>>>;

/// Result of one peer operation started by an inbound message.
#[derive(Debug)]
pub enum SignalCompletion {
    Answer(Result<(), SignalingError>),
    Candidate(Result<(), SignalingError>),
    Offer(Result<SessionDescription, SignalingError>),
}

/// One unit of signaling work for a driving loop.
#[derive(Debug)]
pub enum SignalStep {
    /// An inbound message to start.
    Message(SignalMessage),
    /// The in-flight operation finished.
    Settled(SignalCompletion),
}

struct InFlight {
    event: &'static str,
    future: SignalFuture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AcquiringMedia,
    Connecting,
    Streaming,
    TornDown,
    /// Absorbing; reached when acquisition or connection setup fails.
    Error,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::AcquiringMedia => "acquiring_media",
            SessionState::Connecting => "connecting",
            SessionState::Streaming => "streaming",
            SessionState::TornDown => "torn_down",
            SessionState::Error => "error",
        }
    }
}

pub struct StreamingSession<D: IMediaDevices, K: IPeerConnector> {
    identity: AttemptIdentity,
    capture: CaptureConfig,
    signaling: SignalingConfig,
    bus: Arc<dyn IMessageBus>,
    devices: D,
    connector: K,
    state: SessionState,
    stream: Option<D::Stream>,
    peer: Option<Arc<Mutex<K::Peer>>>,
    in_flight: Option<InFlight>,
    inbox_tx: mpsc::UnboundedSender<SignalMessage>,
    inbox: mpsc::UnboundedReceiver<SignalMessage>,
    token: CancellationToken,
    subscribed: bool,
}

impl<D: IMediaDevices, K: IPeerConnector> StreamingSession<D, K> {
    /// `token` is shared with the owner; cancelling it makes every late
    /// result a no-op.
    pub fn new(
        identity: AttemptIdentity,
        capture: CaptureConfig,
        signaling: SignalingConfig,
        bus: Arc<dyn IMessageBus>,
        devices: D,
        connector: K,
        token: CancellationToken,
    ) -> Self {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        Self {
            identity,
            capture,
            signaling,
            bus,
            devices,
            connector,
            state: SessionState::Uninitialized,
            stream: None,
            peer: None,
            in_flight: None,
            inbox_tx,
            inbox,
            token,
            subscribed: false,
        }
    }

    /// Acquire media, open the peer connection, attach tracks, and send the
    /// first offer. Does nothing unless the session is still uninitialized.
    ///
    /// Acquisition failure publishes `camera_off` and leaves the session in
    /// `Error`; the caller decides whether monitoring continues degraded.
    pub async fn start(&mut self) -> VigilResult<()> {
        if self.state != SessionState::Uninitialized {
            return Ok(());
        }
        self.transition(SessionState::AcquiringMedia);

        let acquired = self.devices.acquire(&self.capture).await;
        let mut stream = match acquired {
            Ok(stream) => stream,
            Err(e) => {
                self.transition(SessionState::Error);
                self.publish_camera_off();
                return Err(e.into());
            }
        };
        if self.is_closed() {
            stream.stop();
            self.teardown();
            return Ok(());
        }
        let tracks = stream.tracks();
        self.stream = Some(stream);

        self.transition(SessionState::Connecting);
        let mut peer = match self.connector.connect(&self.signaling) {
            Ok(peer) => peer,
            Err(e) => {
                self.transition(SessionState::Error);
                return Err(e.into());
            }
        };
        attach_tracks(&mut peer, &tracks);
        let peer = Arc::new(Mutex::new(peer));
        self.peer = Some(peer.clone());
        self.subscribe();

        // No tick is scheduled before start returns, so the first offer is
        // awaited here.
        match negotiate_offer(peer).await {
            Ok(offer) => {
                self.complete(SignalCompletion::Offer(Ok(offer)));
                Ok(())
            }
            Err(e) => {
                self.transition(SessionState::Error);
                Err(e.into())
            }
        }
    }

    /// Apply one inbound message and wait for its peer operation. Messages
    /// for another attempt, or arriving after teardown, are dropped.
    pub async fn handle_signal(&mut self, message: SignalMessage) {
        self.settle().await;
        self.begin_signal(message);
        self.settle().await;
    }

    /// Advance signaling as far as it goes without waiting: finish a ready
    /// in-flight operation, start queued messages while the peer is free,
    /// then publish gathered local candidates. Returns the number of inbound
    /// messages taken off the queue.
    pub async fn pump(&mut self) -> usize {
        let handled = std::future::poll_fn(|cx| Poll::Ready(self.advance(cx))).await;
        self.flush_local_candidates();
        handled
    }

    /// Validate `message` and start its peer operation. Messages that need
    /// no peer work are settled immediately. Only one operation runs at a
    /// time; callers wait for [`is_busy`](Self::is_busy) to clear first.
    pub fn begin_signal(&mut self, message: SignalMessage) {
        let event = message.event_name();
        let span = vigil_observability::signaling_span!(self.identity.student_exam_id, event);
        let _entered = span.enter();
        if self.is_closed() {
            tracing::debug!(message = event, "session closed, message discarded");
            return;
        }
        if self.in_flight.is_some() {
            events::signaling_dropped(event, "another signaling operation in flight");
            return;
        }
        if message.student_exam_id() != self.identity.student_exam_id {
            events::signaling_dropped(event, "addressed to another attempt");
            return;
        }
        let Some(peer) = self.peer.clone() else {
            events::signaling_dropped(event, "no peer connection");
            return;
        };
        let future: SignalFuture = match message {
            SignalMessage::Answer(payload) => {
                if payload.answer.kind != SdpType::Answer {
                    events::signaling_dropped(event, "description is not an answer");
                    return;
                }
                Box::pin(async move {
                    let mut peer = peer.lock().await;
                    SignalCompletion::Answer(peer.set_remote_description(payload.answer).await)
                })
            }
            SignalMessage::Candidate(payload) => {
                let Some(candidate) = payload.candidate else {
                    return;
                };
                Box::pin(async move {
                    let mut peer = peer.lock().await;
                    SignalCompletion::Candidate(peer.add_ice_candidate(candidate).await)
                })
            }
            SignalMessage::RequestOffer(_) => {
                Box::pin(async move { SignalCompletion::Offer(negotiate_offer(peer).await) })
            }
        };
        self.in_flight = Some(InFlight { event, future });
    }

    /// Whether a peer operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Wait for the next unit of signaling work: the in-flight operation
    /// while there is one, otherwise the next inbound message. Cancel-safe.
    /// `None` once the session is torn down and the queue is empty.
    pub async fn next_step(&mut self) -> Option<SignalStep> {
        if self.is_busy() {
            Some(SignalStep::Settled(self.next_completion().await))
        } else {
            self.inbox.recv().await.map(SignalStep::Message)
        }
    }

    /// Apply a step returned by [`next_step`](Self::next_step).
    pub fn apply(&mut self, step: SignalStep) {
        match step {
            SignalStep::Message(message) => self.begin_signal(message),
            SignalStep::Settled(completion) => self.complete(completion),
        }
    }

    /// Wait for the in-flight operation. Dropping this future leaves the
    /// operation in place. Pending forever when nothing is in flight.
    async fn next_completion(&mut self) -> SignalCompletion {
        match self.in_flight.as_mut() {
            Some(in_flight) => {
                let completion = in_flight.future.as_mut().await;
                self.in_flight = None;
                completion
            }
            None => std::future::pending().await,
        }
    }

    /// Apply a finished peer operation. Discarded once the session is closed.
    pub fn complete(&mut self, completion: SignalCompletion) {
        if self.is_closed() {
            tracing::debug!("signaling result arrived after teardown, discarded");
            return;
        }
        match completion {
            SignalCompletion::Answer(Ok(())) if self.state == SessionState::Connecting => {
                self.transition(SessionState::Streaming)
            }
            SignalCompletion::Answer(Ok(())) | SignalCompletion::Candidate(Ok(())) => {}
            SignalCompletion::Answer(Err(e)) => {
                events::signaling_dropped(wire::WEBRTC_ANSWER, &e.to_string())
            }
            SignalCompletion::Candidate(Err(e)) => {
                tracing::debug!(error = %e, "ignoring stale or duplicate ICE candidate");
            }
            SignalCompletion::Offer(Ok(offer)) => self.publish_offer(offer),
            SignalCompletion::Offer(Err(e)) => {
                events::signaling_dropped(wire::REQUEST_OFFER, &e.to_string())
            }
        }
    }

    /// Wait for the in-flight operation, if any, and apply it.
    pub async fn settle(&mut self) {
        if self.is_busy() {
            let completion = self.next_completion().await;
            self.complete(completion);
        }
    }

    /// Wait for the next inbound message. Cancel-safe; returns `None` once
    /// the session is torn down and the queue is empty.
    pub async fn recv_signal(&mut self) -> Option<SignalMessage> {
        self.inbox.recv().await
    }

    /// Publish every local ICE candidate gathered since the last call.
    pub fn flush_local_candidates(&mut self) -> usize {
        if self.is_closed() {
            return 0;
        }
        let Some(peer) = self.peer.as_ref() else {
            return 0;
        };
        // Busy with an operation; the candidates go out on a later step.
        let Ok(mut peer) = peer.try_lock() else {
            return 0;
        };
        let candidates = peer.take_local_candidates();
        drop(peer);
        for candidate in &candidates {
            let payload = CandidatePayload {
                candidate: Some(candidate.clone()),
                student_exam_id: self.identity.student_exam_id.clone(),
                email: Some(self.identity.user_email.clone()),
                name: Some(self.identity.user_name.clone()),
                roll_number: Some(self.identity.user_roll_number.clone()),
            };
            publish(self.bus.as_ref(), wire::WEBRTC_CANDIDATE, &payload);
        }
        candidates.len()
    }

    /// Enable or disable the local audio track. False when there is no stream.
    pub fn set_audio_enabled(&mut self, enabled: bool) -> bool {
        match self.stream.as_mut() {
            Some(stream) => {
                stream.set_enabled(TrackKind::Audio, enabled);
                true
            }
            None => false,
        }
    }

    /// Capture handle for the sampling loop, while one exists.
    pub fn capture_mut(&mut self) -> Option<&mut D::Stream> {
        self.stream.as_mut()
    }

    /// Unsubscribe, stop tracks, close the peer. Safe from any state, any
    /// number of times.
    pub fn teardown(&mut self) {
        self.token.cancel();
        if self.subscribed {
            for event in wire::SIGNALING_INBOUND {
                self.bus.unsubscribe(event);
            }
            self.subscribed = false;
        }
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(message = in_flight.event, "in-flight signaling abandoned");
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        if let Some(peer) = self.peer.take() {
            match peer.try_lock() {
                Ok(mut peer) => peer.close(),
                Err(_) => tracing::warn!("peer connection still in use, not closed"),
            }
        }
        self.inbox.close();
        while self.inbox.try_recv().is_ok() {}
        self.transition(SessionState::TornDown);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::TornDown || self.token.is_cancelled()
    }

    pub fn identity(&self) -> &AttemptIdentity {
        &self.identity
    }

    /// Track ids attached to the peer connection. Empty while an operation
    /// holds the connection.
    pub fn sender_track_ids(&self) -> Vec<String> {
        self.peer
            .as_ref()
            .and_then(|peer| peer.try_lock().ok().map(|peer| peer.sender_track_ids()))
            .unwrap_or_default()
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.stream.as_ref().map(|s| s.tracks()).unwrap_or_default()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    fn publish_offer(&self, offer: SessionDescription) {
        let payload = OfferPayload {
            offer,
            email: self.identity.user_email.clone(),
            student_exam_id: self.identity.student_exam_id.clone(),
            name: self.identity.user_name.clone(),
            roll_number: self.identity.user_roll_number.clone(),
        };
        publish(self.bus.as_ref(), wire::WEBRTC_OFFER, &payload);
    }

    /// One non-blocking pass over the in-flight operation and the queue.
    fn advance(&mut self, cx: &mut Context<'_>) -> usize {
        let mut handled = 0;
        loop {
            if let Some(in_flight) = self.in_flight.as_mut() {
                let poll = in_flight.future.as_mut().poll(cx);
                match poll {
                    Poll::Ready(completion) => {
                        self.in_flight = None;
                        self.complete(completion);
                    }
                    Poll::Pending => return handled,
                }
            }
            match self.inbox.try_recv() {
                Ok(message) => {
                    handled += 1;
                    self.begin_signal(message);
                }
                Err(_) => return handled,
            }
        }
    }

    fn subscribe(&mut self) {
        if self.subscribed {
            return;
        }
        for event in wire::SIGNALING_INBOUND {
            let tx = self.inbox_tx.clone();
            let handler = move |payload: &serde_json::Value| {
                match SignalMessage::parse(event, payload) {
                    Ok(message) if message.is_self_originated() => {
                        tracing::trace!(event = %event, "own outbound message, ignored");
                    }
                    Ok(message) => {
                        // Receiver is gone once the session is torn down.
                        let _ = tx.send(message);
                    }
                    Err(e) => events::signaling_dropped(event, &e.to_string()),
                }
            };
            self.bus.subscribe(event, Arc::new(handler));
        }
        self.subscribed = true;
    }

    fn publish_camera_off(&self) {
        let payload = CameraOffPayload {
            student_exam_id: self.identity.student_exam_id.clone(),
            email: self.identity.user_email.clone(),
        };
        publish(self.bus.as_ref(), wire::CAMERA_OFF, &payload);
    }

    fn transition(&mut self, to: SessionState) {
        if self.state == to {
            return;
        }
        events::session_state_changed(self.state.as_str(), to.as_str());
        self.state = to;
    }
}

/// Create an offer and install it as the local description.
async fn negotiate_offer<P: IPeerConnection>(
    peer: Arc<Mutex<P>>,
) -> Result<SessionDescription, SignalingError> {
    let mut peer = peer.lock().await;
    let offer = peer.create_offer().await?;
    peer.set_local_description(offer.clone()).await?;
    Ok(offer)
}

/// Attach each track at most once, by track id.
fn attach_tracks<P: IPeerConnection>(peer: &mut P, tracks: &[MediaTrack]) {
    for track in tracks {
        if peer.sender_track_ids().iter().any(|id| id == &track.id) {
            continue;
        }
        if let Err(e) = peer.add_track(track) {
            tracing::warn!(track_id = %track.id, error = %e, "track not attached");
        }
    }
}

fn publish<T: serde::Serialize>(bus: &dyn IMessageBus, event: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => bus.publish(event, value),
        Err(e) => tracing::warn!(event = %event, error = %e, "payload serialization failed"),
    }
}
