//! Audio level measurement.

/// RMS of unsigned 8-bit time-domain samples centered at 128, in [0,1].
pub fn rms_level(samples: &[u8]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples
        .iter()
        .map(|&s| {
            let v = (f64::from(s) - 128.0) / 128.0;
            v * v
        })
        .sum();
    (sum / samples.len() as f64).sqrt()
}

/// Fixed-window level meter over the microphone's time-domain samples.
#[derive(Debug, Clone)]
pub struct AudioAnalyzer {
    window: usize,
    released: bool,
}

impl AudioAnalyzer {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            released: false,
        }
    }

    /// Number of samples requested per reading.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Level of the most recent `window` samples. Silence once released.
    pub fn level(&self, samples: &[u8]) -> f64 {
        if self.released {
            return 0.0;
        }
        let start = samples.len().saturating_sub(self.window);
        rms_level(&samples[start..])
    }

    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
