use serde::{Deserialize, Serialize};

use super::defaults;

/// Resilience Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Path of the JSON state file used by the file-backed store.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: defaults::DEFAULT_STATE_FILENAME.to_string(),
        }
    }
}
