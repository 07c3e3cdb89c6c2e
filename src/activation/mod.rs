pub mod tanh;

pub use tanh::{transfer, transfer_derivative};
