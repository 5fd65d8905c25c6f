use crate::errors::DetectorError;
use crate::models::{LandmarkSet, VideoFrame};

/// Opaque external landmark detector (face mesh or hand tracker).
#[allow(async_fn_in_trait)]
pub trait ILandmarkDetector {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// One landmark set per detected face or hand.
    async fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectorError>;
}
