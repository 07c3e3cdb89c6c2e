use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Neuron count per layer, bias excluded, input layer first.
///
/// Always holds at least two entries (input and output) and no zero entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    layers: Vec<usize>,
}

impl Topology {
    pub fn new(layers: Vec<usize>) -> Result<Topology> {
        if layers.len() < 2 {
            return Err(NetError::InvalidTopology(format!(
                "need at least an input and an output layer, got {} layer(s)",
                layers.len()
            )));
        }
        if let Some(pos) = layers.iter().position(|&n| n == 0) {
            return Err(NetError::InvalidTopology(format!(
                "layer {pos} has no neurons"
            )));
        }
        Ok(Topology { layers })
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0]
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Outgoing connections per neuron of layer `i`: the next layer's
    /// neuron count including its bias, or 0 for the output layer.
    pub fn outgoing_count(&self, i: usize) -> usize {
        self.layers.get(i + 1).map_or(0, |&next| next + 1)
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetError;

    fn try_from(layers: Vec<usize>) -> Result<Topology> {
        Topology::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.layers
    }
}
