use crate::model::ExchangeBuilderManager;

#[cfg(feature = "binance")]
pub use trading_exchange_binance as binance;
#[cfg(feature = "bittrex")]
pub use trading_exchange_bittrex as bittrex;
#[cfg(feature = "huobi")]
pub use trading_exchange_huobi as huobi;
#[cfg(feature = "stable")]
pub use trading_exchange_stable as stable;

/// One builder per compiled-in exchange, each with its default
/// environment table.
pub fn get_exchange_builder_manager() -> ExchangeBuilderManager {
    let mut manager = ExchangeBuilderManager::new();
    #[cfg(feature = "stable")]
    manager.add(Box::new(stable::StableExchangeBuilder::new()));
    #[cfg(feature = "bittrex")]
    manager.add(Box::new(bittrex::BittrexExchangeBuilder::new()));
    #[cfg(feature = "binance")]
    manager.add(Box::new(binance::BinanceExchangeBuilder::new()));
    #[cfg(feature = "huobi")]
    manager.add(Box::new(huobi::HuobiExchangeBuilder::new()));
    manager
}
