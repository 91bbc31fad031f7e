mod env;
mod log;

pub use env::*;
pub use log::*;

pub mod signal;
pub mod utils;
