use rand::Rng;

use crate::layers::neuron::Neuron;

/// Output value the trailing bias neuron is pinned to.
pub const BIAS_OUTPUT: f64 = 1.0;

/// An ordered run of neurons whose last element is the bias neuron.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Builds `size` regular neurons plus one bias neuron, each with
    /// `outgoing_count` random outgoing weights.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        outgoing_count: usize,
        init_scale: f64,
        rng: &mut R,
    ) -> Layer {
        // `..=` leaves room for the bias at index `size`.
        let mut neurons: Vec<Neuron> = (0..=size)
            .map(|index| Neuron::random(outgoing_count, index, init_scale, rng))
            .collect();

        if let Some(bias) = neurons.last_mut() {
            bias.set_output(BIAS_OUTPUT);
        }

        Layer { neurons }
    }

    /// Wraps an existing neuron sequence; the last neuron is treated as bias.
    #[cfg(test)]
    pub(crate) fn from_neurons(neurons: Vec<Neuron>) -> Layer {
        Layer { neurons }
    }

    /// Total neuron count, bias included.
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    /// Every neuron except the trailing bias.
    pub fn non_bias(&self) -> &[Neuron] {
        let end = self.neurons.len().saturating_sub(1);
        &self.neurons[..end]
    }

    pub(crate) fn non_bias_mut(&mut self) -> &mut [Neuron] {
        let end = self.neurons.len().saturating_sub(1);
        &mut self.neurons[..end]
    }

    pub fn bias(&self) -> Option<&Neuron> {
        self.neurons.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_appends_bias() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Layer::new(3, 4, 1.0, &mut rng);

        assert_eq!(layer.len(), 4);
        assert_eq!(layer.non_bias().len(), 3);
        let bias = layer.bias().unwrap();
        assert_eq!(bias.output(), BIAS_OUTPUT);
        assert_eq!(bias.index(), 3);
        for (i, n) in layer.neurons().iter().enumerate() {
            assert_eq!(n.index(), i);
            assert_eq!(n.outgoing_weights().len(), 4);
        }
    }
}
