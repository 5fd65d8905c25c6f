use crate::models::AlertEvent;

/// UI log receiving each alert for display. Never read back by the engine.
pub trait IAlertSink: Send + Sync {
    fn append_alert(&self, event: &AlertEvent);
}

/// Why the candidate is being moved off the exam view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Violation limit reached; the attempt was auto-submitted.
    Locked,
    /// The candidate submitted normally.
    Submitted,
}

/// Moves the candidate away from the exam view.
pub trait INavigator: Send + Sync {
    fn leave_exam(&self, reason: ExitReason);
}
