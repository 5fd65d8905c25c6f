//! Structured log events for key monitoring operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log an emitted alert.
pub fn alert_emitted(violation: &str, issue: &str, count: u32) {
    tracing::warn!(
        event = "alert_emitted",
        violation = %violation,
        issue = %issue,
        count = count,
        "integrity alert emitted"
    );
}

/// Log a ledger increment and the persisted count.
pub fn violation_counted(violation: &str, count: u32, max: u32) {
    tracing::info!(
        event = "violation_counted",
        violation = %violation,
        count = count,
        max = max,
        "violation counted"
    );
}

/// Log an alert held back by its cooldown.
pub fn alert_suppressed(violation: &str, remaining_ms: i64) {
    tracing::debug!(
        event = "alert_suppressed",
        violation = %violation,
        remaining_ms = remaining_ms,
        "alert suppressed by cooldown"
    );
}

/// Log the lock transition.
pub fn session_locked(attempt_id: &str, trigger: &str, count: u32) {
    tracing::error!(
        event = "session_locked",
        attempt_id = %attempt_id,
        trigger = %trigger,
        count = count,
        "violation limit reached, attempt locked"
    );
}

/// Log a failed submission call. The lock stands regardless.
pub fn submission_failed(attempt_id: &str, error: &str) {
    tracing::warn!(
        event = "submission_failed",
        attempt_id = %attempt_id,
        error = %error,
        "exam submission failed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a detector failure treated as "no detections".
pub fn detector_failed(detector: &str, error: &str) {
    tracing::warn!(
        event = "detector_failed",
        detector = %detector,
        error = %error,
        "detector failed, treating tick as empty"
    );
}

/// Log a dropped signaling message.
pub fn signaling_dropped(event_name: &str, reason: &str) {
    tracing::warn!(
        event = "signaling_dropped",
        message = %event_name,
        reason = %reason,
        "signaling message dropped"
    );
}

/// Log a streaming session state change.
pub fn session_state_changed(from: &str, to: &str) {
    tracing::info!(
        event = "session_state_changed",
        from = %from,
        to = %to,
        "streaming session state changed"
    );
}

/// Log a Resilience Store write that did not stick.
pub fn persistence_failed(key: &str, error: &str) {
    tracing::warn!(
        event = "persistence_failed",
        key = %key,
        error = %error,
        "state persistence failed, keeping in-memory value"
    );
}
