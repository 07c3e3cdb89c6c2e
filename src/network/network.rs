use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{NetError, Result};
use crate::layers::{layer::Layer, neuron::DEFAULT_INIT_SCALE};
use crate::loss::rms::{RecentAverage, RmsError, DEFAULT_SMOOTHING};
use crate::network::topology::Topology;
use crate::optim::momentum::Momentum;

/// Construction-time knobs for a `Network`.
///
/// Deserialization fills missing fields with defaults and then runs
/// `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionsRepr")]
pub struct NetworkOptions {
    pub optimizer: Momentum,
    /// Weights and delta-weights start uniform in `[-init_scale, init_scale]`.
    pub init_scale: f64,
    /// Smoothing factor of the recent average error.
    pub smoothing: f64,
}

/// Unchecked wire form of `NetworkOptions`.
#[derive(Deserialize)]
#[serde(default)]
struct OptionsRepr {
    optimizer: Momentum,
    init_scale: f64,
    smoothing: f64,
}

impl Default for OptionsRepr {
    fn default() -> Self {
        let NetworkOptions { optimizer, init_scale, smoothing } = NetworkOptions::default();
        OptionsRepr { optimizer, init_scale, smoothing }
    }
}

impl TryFrom<OptionsRepr> for NetworkOptions {
    type Error = NetError;

    fn try_from(repr: OptionsRepr) -> Result<NetworkOptions> {
        let options = NetworkOptions {
            optimizer: repr.optimizer,
            init_scale: repr.init_scale,
            smoothing: repr.smoothing,
        };
        options.validate()?;
        Ok(options)
    }
}

impl NetworkOptions {
    /// Rejects settings that would divide by zero or push weights the wrong
    /// way: `smoothing >= 0`, `init_scale > 0`, `eta` and `alpha` non-negative,
    /// all finite.
    pub fn validate(&self) -> Result<()> {
        let Momentum { eta, alpha, .. } = self.optimizer;
        if !(self.smoothing.is_finite() && self.smoothing >= 0.0) {
            return Err(NetError::InvalidOptions(format!(
                "smoothing must be finite and >= 0, got {}",
                self.smoothing
            )));
        }
        if !(self.init_scale.is_finite() && self.init_scale > 0.0) {
            return Err(NetError::InvalidOptions(format!(
                "init_scale must be finite and > 0, got {}",
                self.init_scale
            )));
        }
        for (name, value) in [("eta", eta), ("alpha", alpha)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(NetError::InvalidOptions(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for NetworkOptions {
    fn default() -> Self {
        NetworkOptions {
            optimizer: Momentum::default(),
            init_scale: DEFAULT_INIT_SCALE,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Fully-connected tanh network.
///
/// Layers are allocated once in `build` and mutated in place afterwards.
/// Callers drive each cycle themselves: `feed_forward`, then optionally
/// `back_propagate`, then `get_results`.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    layers: Vec<Layer>,
    optimizer: Momentum,
    error: f64,
    recent_average: RecentAverage,
}

impl Network {
    /// Builds a network with default options and thread-local randomness.
    pub fn build(topology: Topology) -> Network {
        Network::build_with_rng(topology, &NetworkOptions::default(), &mut rand::thread_rng())
    }

    /// Builds a network drawing initial weights from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(
        topology: Topology,
        options: &NetworkOptions,
        rng: &mut R,
    ) -> Network {
        let layers = topology.layers().iter().enumerate()
            .map(|(i, &size)| Layer::new(size, topology.outgoing_count(i), options.init_scale, rng))
            .collect();

        Network {
            topology,
            layers,
            optimizer: options.optimizer,
            error: 0.0,
            recent_average: RecentAverage::new(options.smoothing),
        }
    }

    /// Validates `layer_sizes` and builds with defaults.
    pub fn from_layer_sizes(layer_sizes: &[usize]) -> Result<Network> {
        Ok(Network::build(Topology::new(layer_sizes.to_vec())?))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn optimizer(&self) -> &Momentum {
        &self.optimizer
    }

    /// Loads `inputs` into the input layer and propagates forward.
    ///
    /// On a length mismatch or a non-finite input nothing is modified.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<()> {
        let expected = self.topology.input_size();
        if inputs.len() != expected {
            return Err(NetError::InputSizeMismatch { expected, got: inputs.len() });
        }
        check_finite(inputs)?;

        for (neuron, &value) in self.layers[0].non_bias_mut().iter_mut().zip(inputs) {
            neuron.set_output(value);
        }

        for i in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(i);
            let previous = &before[i - 1];
            for neuron in after[0].non_bias_mut() {
                neuron.feed_forward(previous);
            }
        }

        Ok(())
    }

    /// Computes the error against `targets`, then gradients and weight
    /// updates from the output layer backwards.
    ///
    /// Uses the outputs of the last `feed_forward`. On a length mismatch or
    /// a non-finite target nothing is modified.
    pub fn back_propagate(&mut self, targets: &[f64]) -> Result<()> {
        let expected = self.topology.output_size();
        if targets.len() != expected {
            return Err(NetError::TargetSizeMismatch { expected, got: targets.len() });
        }
        check_finite(targets)?;

        let last = self.layers.len() - 1;

        let outputs = self.get_results();
        self.error = RmsError::error(&outputs, targets);
        self.recent_average.update(self.error);
        trace!(error = self.error, recent = self.recent_average.value(), "back_propagate");

        for (neuron, &target) in self.layers[last].non_bias_mut().iter_mut().zip(targets) {
            neuron.calculate_output_gradient(target);
        }

        for i in (1..last).rev() {
            let (before, after) = self.layers.split_at_mut(i + 1);
            let next = &after[0];
            for neuron in before[i].neurons_mut() {
                neuron.calculate_hidden_gradient(next);
            }
        }

        let optimizer = self.optimizer;
        for i in (1..=last).rev() {
            let (before, after) = self.layers.split_at_mut(i);
            let previous = &mut before[i - 1];
            for neuron in after[0].non_bias() {
                neuron.update_input_weights(previous, &optimizer);
            }
        }

        Ok(())
    }

    /// Non-bias outputs of the last layer, in index order.
    pub fn get_results(&self) -> Vec<f64> {
        self.layers
            .last()
            .map(|layer| layer.non_bias().iter().map(|n| n.output()).collect())
            .unwrap_or_default()
    }

    /// RMS error of the latest `back_propagate`.
    pub fn current_error(&self) -> f64 {
        self.error
    }

    pub fn recent_average_error(&self) -> f64 {
        self.recent_average.value()
    }
}

/// First NaN or infinity in `values`, as an error.
fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(NetError::NonFiniteValue { index }),
        None => Ok(()),
    }
}
