mod token;
mod tx;

pub use token::*;
pub use tx::*;
