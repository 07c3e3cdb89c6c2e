pub mod network;
pub mod spec;
pub mod topology;

pub use network::{Network, NetworkOptions};
pub use spec::NetworkSpec;
pub use topology::Topology;
