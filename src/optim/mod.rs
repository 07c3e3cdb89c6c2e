pub mod momentum;

pub use momentum::{Momentum, UpdateRule, ALPHA, ETA};
