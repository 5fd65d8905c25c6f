//! FrameSampler: one capture read plus both detectors per tick.

use std::time::Duration;

use chrono::{DateTime, Utc};
use vigil_core::config::{CaptureConfig, DetectorConfig};
use vigil_core::errors::DetectorError;
use vigil_core::models::{LandmarkSet, ObservationFrame, VideoFrame};
use vigil_core::traits::{IMediaStream, ILandmarkDetector};
use vigil_detection::AudioAnalyzer;
use vigil_observability::tracing_setup::events;

/// What one sampling pass produced, including what was missing.
#[derive(Debug, Clone)]
pub struct Sample {
    pub frame: ObservationFrame,
    pub video_available: bool,
    pub audio_available: bool,
    pub face_error: Option<DetectorError>,
    pub hand_error: Option<DetectorError>,
}

/// Pulls a frame and an audio window from the capture handle and runs the
/// external detectors on the frame. Detector failures and timeouts count as
/// "no detections".
pub struct FrameSampler<F: ILandmarkDetector, H: ILandmarkDetector> {
    face_detector: F,
    hand_detector: H,
    timeout: Duration,
    analyzer: AudioAnalyzer,
}

impl<F: ILandmarkDetector, H: ILandmarkDetector> FrameSampler<F, H> {
    pub fn new(
        face_detector: F,
        hand_detector: H,
        capture: &CaptureConfig,
        detector: &DetectorConfig,
    ) -> Self {
        Self {
            face_detector,
            hand_detector,
            timeout: detector.timeout(),
            analyzer: AudioAnalyzer::new(capture.fft_size),
        }
    }

    /// Sample once. A missing capture handle yields an empty, silent frame.
    pub async fn sample<S: IMediaStream>(
        &mut self,
        stream: Option<&mut S>,
        now: DateTime<Utc>,
    ) -> Sample {
        let mut sample = Sample {
            frame: ObservationFrame::empty(now),
            video_available: false,
            audio_available: false,
            face_error: None,
            hand_error: None,
        };
        let Some(stream) = stream else {
            return sample;
        };

        if !self.analyzer.is_released() {
            if let Some(samples) = stream.read_audio(self.analyzer.window()) {
                sample.audio_available = true;
                sample.frame.audio_rms = self.analyzer.level(&samples);
            }
        }

        let Some(video) = stream.read_frame() else {
            return sample;
        };
        sample.video_available = true;
        match detect(&mut self.face_detector, &video, self.timeout).await {
            Ok(faces) => sample.frame.faces = faces,
            Err(e) => sample.face_error = Some(e),
        }
        match detect(&mut self.hand_detector, &video, self.timeout).await {
            Ok(hands) => sample.frame.hands = hands,
            Err(e) => sample.hand_error = Some(e),
        }
        sample
    }

    /// Stop reading audio; every later sample is silent.
    pub fn release(&mut self) {
        self.analyzer.release();
    }

    pub fn is_released(&self) -> bool {
        self.analyzer.is_released()
    }

    pub fn face_detector(&self) -> &F {
        &self.face_detector
    }

    pub fn hand_detector(&self) -> &H {
        &self.hand_detector
    }
}

async fn detect<T: ILandmarkDetector>(
    detector: &mut T,
    frame: &VideoFrame,
    timeout: Duration,
) -> Result<Vec<LandmarkSet>, DetectorError> {
    let outcome = tokio::time::timeout(timeout, detector.detect(frame)).await;
    let result = match outcome {
        Ok(result) => result,
        Err(_) => Err(DetectorError::Timeout {
            detector: detector.name().to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    };
    if let Err(e) = &result {
        events::detector_failed(detector.name(), &e.to_string());
    }
    result
}
