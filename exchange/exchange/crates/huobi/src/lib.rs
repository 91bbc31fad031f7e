pub mod builder;
pub mod exchange;
pub mod urls;

pub use builder::HuobiExchangeBuilder;
pub use exchange::HuobiExchange;
