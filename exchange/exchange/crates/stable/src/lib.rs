//! The stable exchange: a placeholder venue for tokens the reserve keeps
//! at fixed rates. It has no remote API, no account and no ledger.

mod builder;
mod exchange;

pub use builder::StableExchangeBuilder;
pub use exchange::StableExchange;
