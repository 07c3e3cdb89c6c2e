use rand::Rng;

use crate::activation::{transfer, transfer_derivative};
use crate::layers::layer::Layer;
use crate::optim::momentum::{Momentum, UpdateRule};

/// Default half-width of the uniform range used for fresh weights.
pub const DEFAULT_INIT_SCALE: f64 = 1.0;

/// A single tanh unit.
///
/// A neuron owns the weights of its *outgoing* connections: entry `k` of
/// `outgoing_weights` is the weight from this neuron to the neuron with
/// index `k` in the next layer. Neurons never hold references to their
/// peers; the next layer reads these weights by index.
#[derive(Debug, Clone)]
pub struct Neuron {
    output: f64,
    gradient: f64,
    outgoing_weights: Vec<f64>,
    delta_weights: Vec<f64>,
    index: usize,
}

impl Neuron {
    /// Creates a neuron with `outgoing_count` random weights and delta-weights
    /// drawn uniformly from `[-1, 1]`.
    pub fn new(outgoing_count: usize, index: usize) -> Neuron {
        Neuron::random(outgoing_count, index, DEFAULT_INIT_SCALE, &mut rand::thread_rng())
    }

    /// Creates a neuron whose weights and delta-weights are drawn uniformly
    /// from `[-init_scale, init_scale]` using `rng`.
    pub fn random<R: Rng + ?Sized>(
        outgoing_count: usize,
        index: usize,
        init_scale: f64,
        rng: &mut R,
    ) -> Neuron {
        let mut outgoing_weights = Vec::with_capacity(outgoing_count);
        let mut delta_weights = Vec::with_capacity(outgoing_count);
        for _ in 0..outgoing_count {
            outgoing_weights.push(random_weight(rng, init_scale));
            delta_weights.push(random_weight(rng, init_scale));
        }

        Neuron {
            output: 0.0,
            gradient: 0.0,
            outgoing_weights,
            delta_weights,
            index,
        }
    }

    /// Creates a neuron with explicit weights; delta-weights start at zero.
    pub fn with_weights(outgoing_weights: Vec<f64>, index: usize) -> Neuron {
        let delta_weights = vec![0.0; outgoing_weights.len()];
        Neuron {
            output: 0.0,
            gradient: 0.0,
            outgoing_weights,
            delta_weights,
            index,
        }
    }

    pub fn set_output(&mut self, value: f64) {
        debug_assert!(value.is_finite(), "neuron output must be finite, got {value}");
        self.output = value;
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    /// Only meaningful after a backprop pass in the current cycle.
    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn outgoing_weights(&self) -> &[f64] {
        &self.outgoing_weights
    }

    pub fn delta_weights(&self) -> &[f64] {
        &self.delta_weights
    }

    /// Weighted sum of every output in `previous_layer` (bias included),
    /// squashed through tanh.
    pub fn feed_forward(&mut self, previous_layer: &Layer) {
        let sum: f64 = previous_layer
            .neurons()
            .iter()
            .map(|p| p.output * p.outgoing_weights[self.index])
            .sum();

        self.output = transfer(sum);
    }

    pub fn calculate_output_gradient(&mut self, target: f64) {
        let delta = target - self.output;
        self.gradient = delta * transfer_derivative(self.output);
    }

    pub fn calculate_hidden_gradient(&mut self, next_layer: &Layer) {
        let dow = self.sum_dow(next_layer);
        self.gradient = dow * transfer_derivative(self.output);
    }

    /// Sum of this neuron's contributions to the errors of `next_layer`,
    /// skipping the next layer's bias.
    fn sum_dow(&self, next_layer: &Layer) -> f64 {
        next_layer
            .non_bias()
            .iter()
            .map(|n| self.outgoing_weights[n.index] * n.gradient)
            .sum()
    }

    /// Rewrites the weight every neuron of `previous_layer` holds towards
    /// this neuron, along with its momentum memory.
    pub fn update_input_weights(&self, previous_layer: &mut Layer, optimizer: &Momentum) {
        for p in previous_layer.neurons_mut() {
            let old_delta = p.delta_weights[self.index];
            let input = match optimizer.rule {
                UpdateRule::Replace => self.output,
                UpdateRule::Accumulate => p.output,
            };
            let new_delta = optimizer.delta(input, self.gradient, old_delta);

            p.delta_weights[self.index] = new_delta;
            p.outgoing_weights[self.index] = optimizer.apply(p.outgoing_weights[self.index], new_delta);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_gradient(&mut self, gradient: f64) {
        self.gradient = gradient;
    }
}

/// Uniform sample in `[-scale, scale]`.
fn random_weight<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer_of(neurons: Vec<Neuron>) -> Layer {
        Layer::from_neurons(neurons)
    }

    #[test]
    fn test_new_allocates_parallel_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = Neuron::random(5, 2, 0.5, &mut rng);
        assert_eq!(n.outgoing_weights().len(), 5);
        assert_eq!(n.delta_weights().len(), 5);
        assert_eq!(n.index(), 2);
        assert_eq!(n.output(), 0.0);
        assert_eq!(n.gradient(), 0.0);
        for w in n.outgoing_weights().iter().chain(n.delta_weights()) {
            assert!((-0.5..=0.5).contains(w));
        }

        let last = Neuron::new(0, 0);
        assert!(last.outgoing_weights().is_empty());
        assert!(last.delta_weights().is_empty());
    }

    #[test]
    fn test_feed_forward_reads_weights_by_index() {
        let mut a = Neuron::with_weights(vec![0.1, 0.4, 0.0], 0);
        a.set_output(2.0);
        let mut bias = Neuron::with_weights(vec![0.2, -0.3, 0.0], 1);
        bias.set_output(1.0);
        let prev = layer_of(vec![a, bias]);

        let mut target = Neuron::with_weights(vec![], 1);
        target.feed_forward(&prev);
        assert_abs_diff_eq!(target.output(), (2.0 * 0.4 - 0.3_f64).tanh(), epsilon = 1e-15);
    }

    #[test]
    fn test_output_gradient() {
        let mut n = Neuron::with_weights(vec![], 0);
        n.set_output(0.5);
        n.calculate_output_gradient(1.0);
        assert_abs_diff_eq!(n.gradient(), 0.5 * 0.75, epsilon = 1e-15);
    }

    #[test]
    fn test_hidden_gradient_skips_next_bias() {
        let mut g0 = Neuron::with_weights(vec![], 0);
        g0.set_gradient(0.2);
        let mut g_bias = Neuron::with_weights(vec![], 1);
        g_bias.set_gradient(100.0);
        let next = layer_of(vec![g0, g_bias]);

        let mut h = Neuron::with_weights(vec![0.5, 0.9], 0);
        h.set_output(0.6);
        h.calculate_hidden_gradient(&next);
        assert_abs_diff_eq!(h.gradient(), 0.5 * 0.2 * (1.0 - 0.36), epsilon = 1e-15);
    }

    #[test]
    fn test_replace_rule_overwrites_weight_with_delta() {
        let mut p0 = Neuron::with_weights(vec![0.7, 0.3], 0);
        p0.set_output(0.25);
        let mut bias = Neuron::with_weights(vec![-0.4, 0.8], 1);
        bias.set_output(1.0);
        let mut prev = layer_of(vec![p0, bias]);

        let mut n = Neuron::with_weights(vec![], 1);
        n.set_output(0.5);
        n.set_gradient(0.2);
        n.update_input_weights(&mut prev, &Momentum::default());

        let expected = 0.15 * 0.5 * 0.2;
        for p in prev.neurons() {
            assert_abs_diff_eq!(p.delta_weights()[1], expected, epsilon = 1e-15);
            assert_abs_diff_eq!(p.outgoing_weights()[1], expected, epsilon = 1e-15);
        }
        // Connections to other neurons are untouched.
        assert_eq!(prev.neurons()[0].outgoing_weights()[0], 0.7);
        assert_eq!(prev.neurons()[1].outgoing_weights()[0], -0.4);
    }

    #[test]
    fn test_accumulate_rule_uses_upstream_output() {
        let mut p0 = Neuron::with_weights(vec![0.7], 0);
        p0.set_output(0.25);
        let mut prev = layer_of(vec![p0]);

        let mut n = Neuron::with_weights(vec![], 0);
        n.set_output(0.5);
        n.set_gradient(0.2);
        let optimizer = Momentum::new(0.15, 0.1, UpdateRule::Accumulate);
        n.update_input_weights(&mut prev, &optimizer);

        let delta = 0.15 * 0.25 * 0.2;
        assert_abs_diff_eq!(prev.neurons()[0].delta_weights()[0], delta, epsilon = 1e-15);
        assert_abs_diff_eq!(prev.neurons()[0].outgoing_weights()[0], 0.7 + delta, epsilon = 1e-15);

        // Second step carries momentum from the first.
        n.update_input_weights(&mut prev, &optimizer);
        let delta2 = 0.15 * 0.25 * 0.2 + 0.1 * delta;
        assert_abs_diff_eq!(prev.neurons()[0].delta_weights()[0], delta2, epsilon = 1e-15);
        assert_abs_diff_eq!(
            prev.neurons()[0].outgoing_weights()[0],
            0.7 + delta + delta2,
            epsilon = 1e-15
        );
    }
}
