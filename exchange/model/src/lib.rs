#[doc(hidden)]
pub mod model {
    pub use crate::*;
}

mod activity;
mod blockchain;
mod common;
pub mod core;
mod market;

pub use activity::*;
pub use blockchain::*;
pub use common::*;
pub use core::*;
pub use market::*;
