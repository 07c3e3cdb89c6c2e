use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::network::topology::Topology;

/// One input vector and the output the network should produce for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Sample {
        Sample { input, target }
    }
}

/// Training data as stored on disk:
///
/// ```json
/// { "samples": [ { "input": [0.0, 1.0], "target": [1.0] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Dataset {
        Dataset { samples }
    }

    /// The four XOR cases with targets 0 and 1.
    pub fn xor() -> Dataset {
        Dataset::new(vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0]),
        ])
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Checks every sample against the input and output sizes of `topology`.
    pub fn validate(&self, topology: &Topology) -> Result<()> {
        if self.samples.is_empty() {
            return Err(NetError::InvalidDataset("no samples".to_string()));
        }
        for (i, sample) in self.samples.iter().enumerate() {
            if sample.input.len() != topology.input_size() {
                return Err(NetError::InvalidDataset(format!(
                    "sample {i}: expected {} inputs, got {}",
                    topology.input_size(),
                    sample.input.len()
                )));
            }
            if sample.target.len() != topology.output_size() {
                return Err(NetError::InvalidDataset(format!(
                    "sample {i}: expected {} targets, got {}",
                    topology.output_size(),
                    sample.target.len()
                )));
            }
            if sample.input.iter().chain(&sample.target).any(|v| !v.is_finite()) {
                return Err(NetError::InvalidDataset(format!("sample {i}: non-finite value")));
            }
        }
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Dataset> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
