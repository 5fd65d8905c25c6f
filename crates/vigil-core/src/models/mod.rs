pub mod alert;
pub mod degradation_event;
pub mod identity;
pub mod ledger;
pub mod lock_state;
pub mod media;
pub mod observation;
pub mod payloads;
pub mod rtc;
pub mod violation;

pub use alert::{iso_timestamp, AlertEvent};
pub use degradation_event::DegradationEvent;
pub use identity::AttemptIdentity;
pub use ledger::ViolationLedger;
pub use lock_state::LockState;
pub use media::{MediaTrack, TrackKind, VideoFrame};
pub use observation::{Landmark, LandmarkSet, ObservationFrame};
pub use rtc::{IceCandidate, SdpType, SessionDescription};
pub use violation::ViolationType;
