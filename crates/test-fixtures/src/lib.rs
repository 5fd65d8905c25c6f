//! Recording fakes for the Vigil collaborator traits, plus small builders
//! for identities, timestamps, and landmark sets.
//!
//! Every fake is `Clone` and shares its state, so a test can hand one copy
//! to the engine and keep another to inspect what happened.

pub mod bus;
pub mod detector;
pub mod media;
pub mod peer;
pub mod sink;
pub mod store;
pub mod submitter;

use chrono::{DateTime, Duration, TimeZone, Utc};
use vigil_core::models::{AttemptIdentity, Landmark, LandmarkSet};

pub use bus::RecordingBus;
pub use detector::ScriptedDetector;
pub use media::{FakeDevices, FakeStream, MediaLog};
pub use peer::{FakeConnector, FakePeer, PeerLog};
pub use sink::{RecordingNavigator, RecordingSink};
pub use store::FailingStore;
pub use submitter::RecordingSubmitter;

pub const ATTEMPT_ID: &str = "se-42";
pub const EMAIL: &str = "ada@example.edu";

/// A complete attempt identity.
pub fn identity() -> AttemptIdentity {
    AttemptIdentity::new(ATTEMPT_ID, EMAIL, "Ada Lovelace", "CS-1815")
}

/// Fixed origin for scripted timelines.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single().unwrap_or_default()
}

/// `t0() + ms`.
pub fn at(ms: i64) -> DateTime<Utc> {
    t0() + Duration::milliseconds(ms)
}

/// Four corner landmarks spanning the box `(x, y, w, h)`.
pub fn box_landmarks(x: f64, y: f64, w: f64, h: f64) -> LandmarkSet {
    vec![
        Landmark::new(x, y),
        Landmark::new(x + w, y),
        Landmark::new(x, y + h),
        Landmark::new(x + w, y + h),
    ]
}

/// A face roughly centered in frame.
pub fn centered_face() -> LandmarkSet {
    box_landmarks(0.35, 0.25, 0.3, 0.4)
}
