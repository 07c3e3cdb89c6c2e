use serde::{Deserialize, Serialize};

/// Number of past samples the recent average error roughly spans.
pub const DEFAULT_SMOOTHING: f64 = 100.0;

pub struct RmsError;

impl RmsError {
    /// Scalar RMS: sqrt(mean((target - output)²))
    pub fn error(outputs: &[f64], targets: &[f64]) -> f64 {
        let n = outputs.len() as f64;
        let sum: f64 = outputs.iter().zip(targets.iter())
            .map(|(o, t)| (t - o).powi(2))
            .sum();
        (sum / n).sqrt()
    }
}

/// Exponentially smoothed running error.
///
/// Starts at 0, so the first update yields `error / (smoothing + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecentAverage {
    value: f64,
    smoothing: f64,
}

impl RecentAverage {
    pub fn new(smoothing: f64) -> RecentAverage {
        RecentAverage { value: 0.0, smoothing }
    }

    pub fn update(&mut self, error: f64) -> f64 {
        self.value = (self.value * self.smoothing + error) / (self.smoothing + 1.0);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for RecentAverage {
    fn default() -> Self {
        RecentAverage::new(DEFAULT_SMOOTHING)
    }
}
