//! Error handling for Vigil.
//! One error enum per subsystem, `thiserror` only.

pub mod acquisition_error;
pub mod config_error;
pub mod detector_error;
pub mod signaling_error;
pub mod store_error;
pub mod submission_error;
pub mod vigil_error;

pub use acquisition_error::AcquisitionError;
pub use config_error::ConfigError;
pub use detector_error::DetectorError;
pub use signaling_error::SignalingError;
pub use store_error::StoreError;
pub use submission_error::SubmissionError;
pub use vigil_error::{VigilError, VigilResult};
