use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Camera and microphone capture constraints plus sampling cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub facing_mode: String,
    pub audio_channel_count: u32,
    pub audio_sample_rate: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
    /// Samples read from the audio analyser per tick.
    pub fft_size: usize,
    /// Sampling Loop cadence.
    pub frame_interval_ms: u64,
}

impl CaptureConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: defaults::DEFAULT_VIDEO_WIDTH,
            height: defaults::DEFAULT_VIDEO_HEIGHT,
            facing_mode: defaults::DEFAULT_FACING_MODE.to_string(),
            audio_channel_count: defaults::DEFAULT_AUDIO_CHANNEL_COUNT,
            audio_sample_rate: defaults::DEFAULT_AUDIO_SAMPLE_RATE,
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
            fft_size: defaults::DEFAULT_ANALYSER_FFT_SIZE,
            frame_interval_ms: defaults::DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}
