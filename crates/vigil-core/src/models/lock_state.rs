use serde::{Deserialize, Serialize};

/// Escalation state of an attempt. `Locked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    #[default]
    Active,
    Locked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        self == LockState::Locked
    }

    /// Persisted representation.
    pub fn as_flag(self) -> &'static str {
        match self {
            LockState::Active => "false",
            LockState::Locked => "true",
        }
    }

    /// Anything other than `"true"` reads as active.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "true" {
            LockState::Locked
        } else {
            LockState::Active
        }
    }
}
