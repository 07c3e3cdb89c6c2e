use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::loss::rms::RmsError;
use crate::network::network::Network;
use crate::train::dataset::Dataset;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` online, one `feed_forward` + `back_propagate` per sample,
/// and returns the statistics of every completed epoch.
///
/// # Early termination
/// The loop stops after the first epoch whose mean error is below
/// `config.target_error`.
///
/// # Errors
/// `InvalidDataset` if the data does not fit the network's topology; the
/// network is left untouched in that case.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    dataset.validate(network.topology())?;

    info!(
        samples = dataset.len(),
        epochs = config.epochs,
        rule = ?network.optimizer().rule,
        "starting training"
    );

    let mut history = Vec::with_capacity(config.epochs);
    let mut order: Vec<usize> = (0..dataset.len()).collect();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(rng);
        }
        let mean_error = run_one_epoch(network, dataset, &order)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_error,
            recent_average_error: network.recent_average_error(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            "Epoch {}: error = {:.6}, recent = {:.6}",
            epoch, stats.mean_error, stats.recent_average_error
        );
        history.push(stats);

        if let Some(target_error) = config.target_error {
            if mean_error < target_error {
                info!(epoch, target_error, "target error reached");
                return Ok(history);
            }
        }
    }

    let last_error = history.last().map_or(0.0, |s| s.mean_error);
    match config.target_error {
        Some(target_error) => warn!(target_error, last_error, "training ended above target error"),
        None => info!(last_error, "training finished"),
    }

    Ok(history)
}

/// Mean RMS error over `dataset` using forward passes only.
pub fn evaluate(network: &mut Network, dataset: &Dataset) -> Result<f64> {
    dataset.validate(network.topology())?;

    let mut total = 0.0;
    for sample in &dataset.samples {
        network.feed_forward(&sample.input)?;
        total += RmsError::error(&network.get_results(), &sample.target);
    }
    Ok(total / dataset.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over the samples in `order`; returns the mean RMS error.
fn run_one_epoch(network: &mut Network, dataset: &Dataset, order: &[usize]) -> Result<f64> {
    let mut total_error = 0.0;

    for &idx in order {
        let sample = &dataset.samples[idx];
        network.feed_forward(&sample.input)?;
        network.back_propagate(&sample.target)?;
        total_error += network.current_error();
    }

    Ok(total_error / order.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use crate::network::{NetworkOptions, Topology};
    use crate::optim::momentum::{Momentum, UpdateRule};
    use crate::train::dataset::Sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn accumulate_net(layers: &[usize], rng: &mut StdRng) -> Network {
        let options = NetworkOptions {
            optimizer: Momentum::new(0.15, 0.1, UpdateRule::Accumulate),
            ..NetworkOptions::default()
        };
        Network::build_with_rng(Topology::new(layers.to_vec()).unwrap(), &options, rng)
    }

    #[test]
    fn test_rejects_mismatched_dataset() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = accumulate_net(&[3, 2, 1], &mut rng);
        let res = train_loop(&mut net, &Dataset::xor(), &TrainConfig::new(5), &mut rng);
        assert!(matches!(res, Err(NetError::InvalidDataset(_))));
        assert_eq!(net.recent_average_error(), 0.0);
    }

    #[test]
    fn test_history_covers_every_epoch() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net = accumulate_net(&[2, 3, 1], &mut rng);
        let history = train_loop(&mut net, &Dataset::xor(), &TrainConfig::new(7), &mut rng).unwrap();

        assert_eq!(history.len(), 7);
        for (i, stats) in history.iter().enumerate() {
            assert_eq!(stats.epoch, i + 1);
            assert_eq!(stats.total_epochs, 7);
            assert!(stats.mean_error.is_finite());
        }
        assert_eq!(history[6].recent_average_error, net.recent_average_error());
    }

    #[test]
    fn test_stops_at_target_error() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut net = accumulate_net(&[1, 2, 1], &mut rng);
        let data = Dataset::new(vec![Sample::new(vec![1.0], vec![0.5])]);
        let config = TrainConfig {
            epochs: 100_000,
            target_error: Some(0.01),
            shuffle: false,
            seed: None,
        };

        let history = train_loop(&mut net, &data, &config, &mut rng).unwrap();
        assert!(history.len() < config.epochs);
        assert!(history.last().unwrap().mean_error < 0.01);
    }

    #[test]
    fn test_evaluate_does_not_train() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = accumulate_net(&[2, 2, 1], &mut rng);
        let data = Dataset::xor();

        let first = evaluate(&mut net, &data).unwrap();
        let second = evaluate(&mut net, &data).unwrap();
        assert_eq!(first, second);
        assert_eq!(net.current_error(), 0.0);
    }
}
