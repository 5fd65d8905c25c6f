use serde::{Deserialize, Serialize};

use super::defaults;

/// Peer connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalingConfig {
    /// STUN/TURN URLs handed to the peer connection.
    pub ice_servers: Vec<String>,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![defaults::DEFAULT_STUN_SERVER.to_string()],
        }
    }
}
