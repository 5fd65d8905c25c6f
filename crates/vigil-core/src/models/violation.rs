use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of integrity violations. Each type has its own cooldown and counter.
///
/// Serialized under the event name the observer dashboard listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationType {
    #[serde(rename = "eye_off")]
    NoFace,
    #[serde(rename = "multiple_faces")]
    MultipleFaces,
    #[serde(rename = "hand_obstruction")]
    HandObstruction,
    #[serde(rename = "loud_voice")]
    LoudVoice,
    #[serde(rename = "voice_no_face")]
    VoiceNoFace,
    #[serde(rename = "tab_switch")]
    TabSwitch,
}

impl ViolationType {
    pub const ALL: [ViolationType; 6] = [
        ViolationType::NoFace,
        ViolationType::MultipleFaces,
        ViolationType::HandObstruction,
        ViolationType::LoudVoice,
        ViolationType::VoiceNoFace,
        ViolationType::TabSwitch,
    ];

    /// Types derived from sampled media, in the fixed per-tick evaluation order.
    pub const SAMPLED: [ViolationType; 5] = [
        ViolationType::NoFace,
        ViolationType::MultipleFaces,
        ViolationType::HandObstruction,
        ViolationType::LoudVoice,
        ViolationType::VoiceNoFace,
    ];

    /// Message bus event name (also the ledger key in the Resilience Store).
    pub fn event_name(self) -> &'static str {
        match self {
            ViolationType::NoFace => "eye_off",
            ViolationType::MultipleFaces => "multiple_faces",
            ViolationType::HandObstruction => "hand_obstruction",
            ViolationType::LoudVoice => "loud_voice",
            ViolationType::VoiceNoFace => "voice_no_face",
            ViolationType::TabSwitch => "tab_switch",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.event_name() == name)
    }

    /// Upper-case code used in logs and operator views.
    pub fn code(self) -> &'static str {
        match self {
            ViolationType::NoFace => "NO_FACE",
            ViolationType::MultipleFaces => "MULTIPLE_FACES",
            ViolationType::HandObstruction => "HAND_OBSTRUCTION",
            ViolationType::LoudVoice => "LOUD_VOICE",
            ViolationType::VoiceNoFace => "VOICE_NO_FACE",
            ViolationType::TabSwitch => "TAB_SWITCH",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
