use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — total number of full passes over the training data
/// - `target_error` — stop after the first epoch whose mean error is below this
/// - `shuffle`      — visit samples in a fresh random order each epoch
/// - `seed`         — seed for weight initialization and shuffling; entropy
///                    when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub target_error: Option<f64>,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl TrainConfig {
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            ..TrainConfig::default()
        }
    }

    /// Random source for this run, seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            target_error: None,
            shuffle: true,
            seed: None,
        }
    }
}
