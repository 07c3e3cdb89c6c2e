pub mod error;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use layers::{Layer, Neuron};
pub use network::{Network, NetworkOptions, NetworkSpec, Topology};
pub use optim::{Momentum, UpdateRule};
pub use train::{evaluate, train_loop, Dataset, EpochStats, Sample, TrainConfig};
