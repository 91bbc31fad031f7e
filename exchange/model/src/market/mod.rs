mod trade;

pub use trade::*;
