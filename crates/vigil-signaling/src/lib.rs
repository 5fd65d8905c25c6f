//! # vigil-signaling
//!
//! Carries the live verification feed to the remote observer.
//!
//! ## Modules
//!
//! - `bus`: `LocalBus`, an in-process `IMessageBus`
//! - `message`: typed inbound signaling messages
//! - `session`: `StreamingSession`, one peer connection per attempt

pub mod bus;
pub mod message;
pub mod session;

pub use bus::LocalBus;
pub use message::SignalMessage;
pub use session::{SessionState, SignalCompletion, SignalStep, StreamingSession};
