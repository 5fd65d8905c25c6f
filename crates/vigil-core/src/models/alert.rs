use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ViolationType;

/// One emitted alert. Created by the emitter on activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub violation: ViolationType,
    pub issue: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(violation: ViolationType, issue: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            violation,
            issue: issue.into(),
            timestamp,
        }
    }

    /// ISO-8601 timestamp with millisecond precision.
    pub fn iso_timestamp(&self) -> String {
        iso_timestamp(self.timestamp)
    }
}

/// Format a timestamp the way the observer expects (`2024-01-01T00:00:00.000Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
