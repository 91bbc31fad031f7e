mod account;
mod adapter;
mod builder;
mod collaborator;
mod config;
mod endpoint;
mod interface;

pub use account::*;
pub use adapter::*;
pub use builder::*;
pub use collaborator::*;
pub use config::*;
pub use endpoint::*;
pub use interface::*;
