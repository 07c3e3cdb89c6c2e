use serde::{Serialize, Deserialize};

/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean RMS error over all samples in this epoch.
    pub mean_error: f64,
    /// The network's smoothed error at the end of the epoch.
    pub recent_average_error: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
