//! Span definitions per operation: sampling tick, signaling step, escalation.
//!
//! Each span carries its metadata via the `tracing` crate.

/// Create a sampling tick span.
#[macro_export]
macro_rules! tick_span {
    ($attempt_id:expr, $tick:expr) => {
        tracing::debug_span!("vigil.tick", attempt_id = %$attempt_id, tick = $tick)
    };
}

/// Create a signaling span.
#[macro_export]
macro_rules! signaling_span {
    ($attempt_id:expr, $message:expr) => {
        tracing::info_span!("vigil.signaling", attempt_id = %$attempt_id, message = %$message)
    };
}

/// Create an escalation span.
#[macro_export]
macro_rules! escalation_span {
    ($attempt_id:expr, $trigger:expr) => {
        tracing::info_span!("vigil.escalation", attempt_id = %$attempt_id, trigger = %$trigger)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const TICK: &str = "vigil.tick";
    pub const SIGNALING: &str = "vigil.signaling";
    pub const ESCALATION: &str = "vigil.escalation";
}
