//! Top-level Vigil configuration with file, environment, and default layers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CaptureConfig, DetectorConfig, MonitorConfig, ObservabilityConfig, SignalingConfig,
    StoreConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`VIGIL_*`)
/// 2. Config file (`vigil.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    pub monitor: MonitorConfig,
    pub capture: CaptureConfig,
    pub detector: DetectorConfig,
    pub signaling: SignalingConfig,
    pub store: StoreConfig,
    pub observability: ObservabilityConfig,
}

impl VigilConfig {
    /// Load configuration from an optional TOML file, then apply `VIGIL_*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    })?;
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VIGIL_*` overrides. Unparseable values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VIGIL_COOLDOWN_MS").and_then(|v| v.parse().ok()) {
            self.monitor.cooldown_ms = v;
        }
        if let Some(v) = lookup("VIGIL_MAX_VIOLATIONS").and_then(|v| v.parse().ok()) {
            self.monitor.max_violations_before_lock = v;
        }
        if let Some(v) = lookup("VIGIL_NO_FACE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.monitor.no_face_timeout_ms = v;
        }
        if let Some(v) = lookup("VIGIL_STATE_PATH") {
            self.store.path = v;
        }
        if let Some(v) = lookup("VIGIL_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;
        for (field, value) in [
            ("monitor.obstructionIouThreshold", m.obstruction_iou_threshold),
            ("monitor.audioRmsThreshold", m.audio_rms_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be in (0.0, 1.0]".to_string(),
                });
            }
        }
        for (field, value) in [
            ("monitor.noFaceTimeoutMs", m.no_face_timeout_ms),
            ("monitor.voiceNoFaceGraceMs", m.voice_no_face_grace_ms),
            ("monitor.cooldownMs", m.cooldown_ms),
            ("capture.frameIntervalMs", self.capture.frame_interval_ms),
            ("detector.timeoutMs", self.detector.timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if m.max_violations_before_lock == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "monitor.maxViolationsBeforeLock".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if m.recent_alert_capacity == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "monitor.recentAlertCapacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.capture.fft_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "capture.fftSize".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.signaling.ice_servers.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "signaling.iceServers".to_string(),
                message: "at least one ICE server is required".to_string(),
            });
        }
        Ok(())
    }
}
