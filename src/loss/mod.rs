pub mod rms;

pub use rms::{RecentAverage, RmsError, DEFAULT_SMOOTHING};
