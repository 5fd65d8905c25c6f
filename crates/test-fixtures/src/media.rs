use std::sync::{Arc, Mutex};

use chrono::Utc;
use vigil_core::config::CaptureConfig;
use vigil_core::errors::AcquisitionError;
use vigil_core::models::{MediaTrack, TrackKind, VideoFrame};
use vigil_core::traits::{IMediaDevices, IMediaStream};

/// What happened to the fake capture devices.
#[derive(Debug, Default)]
pub struct MediaLog {
    pub acquisitions: usize,
    pub stops: usize,
    pub audio_enabled: Option<bool>,
    pub video_enabled: Option<bool>,
    /// Returned by every `read_audio`; `None` means no analyser.
    pub audio: Option<u8>,
    pub frames: bool,
    /// Track list reported by the stream; duplicates allowed.
    pub tracks: Vec<MediaTrack>,
}

/// Camera + microphone that either succeed with a `FakeStream` or fail.
#[derive(Clone)]
pub struct FakeDevices {
    failure: Option<AcquisitionError>,
    log: Arc<Mutex<MediaLog>>,
}

impl FakeDevices {
    /// Devices producing frames and silent audio.
    pub fn working() -> Self {
        let log = MediaLog {
            audio: Some(128),
            frames: true,
            tracks: vec![
                MediaTrack::new("audio-0", TrackKind::Audio),
                MediaTrack::new("video-0", TrackKind::Video),
            ],
            ..MediaLog::default()
        };
        Self {
            failure: None,
            log: Arc::new(Mutex::new(log)),
        }
    }

    pub fn denied() -> Self {
        Self {
            failure: Some(AcquisitionError::PermissionDenied {
                device: "camera".to_string(),
            }),
            log: Arc::default(),
        }
    }

    /// Every audio sample reads as `sample` (128 is silence).
    pub fn set_audio_sample(&self, sample: Option<u8>) {
        self.log.lock().unwrap().audio = sample;
    }

    pub fn set_tracks(&self, tracks: Vec<MediaTrack>) {
        self.log.lock().unwrap().tracks = tracks;
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, MediaLog> {
        self.log.lock().unwrap()
    }
}

impl IMediaDevices for FakeDevices {
    type Stream = FakeStream;

    async fn acquire(&self, _constraints: &CaptureConfig) -> Result<FakeStream, AcquisitionError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.log.lock().unwrap().acquisitions += 1;
        Ok(FakeStream {
            log: self.log.clone(),
            stopped: false,
        })
    }
}

pub struct FakeStream {
    log: Arc<Mutex<MediaLog>>,
    stopped: bool,
}

impl IMediaStream for FakeStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        self.log.lock().unwrap().tracks.clone()
    }

    fn read_frame(&mut self) -> Option<VideoFrame> {
        if self.stopped || !self.log.lock().unwrap().frames {
            return None;
        }
        Some(VideoFrame {
            width: 640,
            height: 480,
            captured_at: Utc::now(),
            pixels: Vec::new(),
        })
    }

    fn read_audio(&mut self, len: usize) -> Option<Vec<u8>> {
        if self.stopped {
            return None;
        }
        let sample = self.log.lock().unwrap().audio?;
        Some(vec![sample; len])
    }

    fn set_enabled(&mut self, kind: TrackKind, enabled: bool) {
        let mut log = self.log.lock().unwrap();
        match kind {
            TrackKind::Audio => log.audio_enabled = Some(enabled),
            TrackKind::Video => log.video_enabled = Some(enabled),
        }
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.log.lock().unwrap().stops += 1;
        }
    }
}
