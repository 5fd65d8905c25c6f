//! # vigil-detection
//!
//! Turns one sampled observation into boolean violation signals.
//!
//! ## Modules
//!
//! - `geometry`: bounding boxes from landmark sets and their IoU
//! - `audio`: RMS level of a centered sample buffer
//! - `evaluator`: `ConditionEvaluator`, the only stateful piece (last face sighting)

pub mod audio;
pub mod evaluator;
pub mod geometry;

pub use audio::{rms_level, AudioAnalyzer};
pub use evaluator::{Condition, ConditionEvaluator, ConditionSignals};
pub use geometry::{iou, BoundingBox};
