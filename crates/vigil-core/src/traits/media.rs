use crate::config::CaptureConfig;
use crate::errors::AcquisitionError;
use crate::models::{MediaTrack, TrackKind, VideoFrame};

/// Camera + microphone access.
#[allow(async_fn_in_trait)]
pub trait IMediaDevices {
    type Stream: IMediaStream;

    async fn acquire(&self, constraints: &CaptureConfig) -> Result<Self::Stream, AcquisitionError>;
}

/// A live capture handle. It may or may not be attached to a visible surface.
pub trait IMediaStream {
    fn tracks(&self) -> Vec<MediaTrack>;

    /// Latest video frame, if the camera produced one since the last read.
    fn read_frame(&mut self) -> Option<VideoFrame>;

    /// Unsigned 8-bit time-domain samples centered at 128, or `None` when no
    /// audio analyser is available.
    fn read_audio(&mut self, len: usize) -> Option<Vec<u8>>;

    fn set_enabled(&mut self, kind: TrackKind, enabled: bool);

    /// Stop every track. Must be idempotent.
    fn stop(&mut self);
}
