pub mod builder;
pub mod urls;

pub use builder::BittrexExchangeBuilder;
