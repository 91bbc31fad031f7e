use trading_exchange_core::model::{EnvironmentInterfaces, ExchangeInterface};

pub const BINANCE_API: &str = "https://api.binance.com";
/// port of the local binance simulator
pub const BINANCE_SIMULATION_PORT: u16 = 5100;

pub fn binance_interfaces() -> EnvironmentInterfaces<ExchangeInterface> {
    EnvironmentInterfaces::standard(
        ExchangeInterface::new(BINANCE_API, BINANCE_API),
        ExchangeInterface::simulation(BINANCE_SIMULATION_PORT),
    )
}
