pub mod error;
pub mod exchange;
pub mod pool;
pub mod provision;

pub mod model {
    pub use trading_exchange_core::model::*;
}
pub mod storage {
    pub use trading_exchange_core::storage::*;
}
