mod term;

pub mod config;
pub mod ethereum;
pub mod node;

pub use term::{error, logger};
