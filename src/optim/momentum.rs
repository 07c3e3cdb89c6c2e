use serde::{Deserialize, Serialize};

/// Learning rate: 0.0 is slow, 0.2 medium, 1.0 fast.
pub const ETA: f64 = 0.15;

/// Fraction of the previous delta-weight carried into the next one.
pub const ALPHA: f64 = 0.1;

/// How a freshly computed delta is applied to a connection weight.
///
/// - `Replace`    — delta is `eta * downstream.output * downstream.gradient
///                  + alpha * old_delta`, and the weight is overwritten with it.
/// - `Accumulate` — delta is `eta * upstream.output * downstream.gradient
///                  + alpha * old_delta`, and the weight is incremented by it
///                  (textbook momentum backprop).
///
/// Only `Accumulate` converges on training data: under `Replace` every
/// weight is just its latest delta, so a network does not drive its error
/// towards zero even on a single repeated sample. Pick `Accumulate` when the
/// goal is to actually fit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    #[default]
    Replace,
    Accumulate,
}

/// Gradient descent with momentum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Momentum {
    pub eta: f64,
    pub alpha: f64,
    pub rule: UpdateRule,
}

impl Momentum {
    pub fn new(eta: f64, alpha: f64, rule: UpdateRule) -> Momentum {
        Momentum { eta, alpha, rule }
    }

    /// Computes the new delta for one connection.
    ///
    /// `input` is the output value that feeds the delta; which neuron it is
    /// taken from depends on `rule`, see `Neuron::update_input_weights`.
    pub fn delta(&self, input: f64, gradient: f64, old_delta: f64) -> f64 {
        self.eta * input * gradient + self.alpha * old_delta
    }

    /// Applies `delta` to `weight` according to the update rule.
    pub fn apply(&self, weight: f64, delta: f64) -> f64 {
        match self.rule {
            UpdateRule::Replace => delta,
            UpdateRule::Accumulate => weight + delta,
        }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Momentum::new(ETA, ALPHA, UpdateRule::Replace)
    }
}
