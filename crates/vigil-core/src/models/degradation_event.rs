use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A subsystem fell back to a lower-quality mode (e.g. camera unavailable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
