/// Hyperbolic tangent; output lies in (-1, 1).
pub fn transfer(x: f64) -> f64 {
    x.tanh()
}

/// Derivative of tanh expressed in terms of its *output*.
///
/// `x` is expected to already be `tanh(sum)`, so this is `1 - x²` rather
/// than `1 - tanh(x)²`.
pub fn transfer_derivative(x: f64) -> f64 {
    1.0 - x * x
}
