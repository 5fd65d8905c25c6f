use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vigil_core::errors::DetectorError;
use vigil_core::models::{LandmarkSet, VideoFrame};
use vigil_core::traits::ILandmarkDetector;

type Outcome = Result<Vec<LandmarkSet>, DetectorError>;

/// Returns scripted results in order, then `fallback` forever.
#[derive(Clone)]
pub struct ScriptedDetector {
    name: String,
    script: Arc<Mutex<VecDeque<Outcome>>>,
    fallback: Arc<Mutex<Vec<LandmarkSet>>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedDetector {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Arc::default(),
            fallback: Arc::default(),
            delay: None,
            calls: Arc::default(),
        }
    }

    /// Always report the same detections.
    pub fn always(name: &str, sets: Vec<LandmarkSet>) -> Self {
        let detector = Self::new(name);
        detector.set_fallback(sets);
        detector
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, outcome: Outcome) -> &Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn set_fallback(&self, sets: Vec<LandmarkSet>) {
        *self.fallback.lock().unwrap() = sets;
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ILandmarkDetector for ScriptedDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn detect(&mut self, _frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectorError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }
}
