use trading_exchange_core::model::{EnvironmentInterfaces, ExchangeInterface};

pub const HUOBI_API: &str = "https://api.huobi.pro";
/// port of the local huobi simulator
pub const HUOBI_SIMULATION_PORT: u16 = 5200;

pub fn huobi_interfaces() -> EnvironmentInterfaces<ExchangeInterface> {
    EnvironmentInterfaces::standard(
        ExchangeInterface::new(HUOBI_API, HUOBI_API),
        ExchangeInterface::simulation(HUOBI_SIMULATION_PORT),
    )
}
