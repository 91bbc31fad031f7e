use trading_exchange_core::model::{EnvironmentInterfaces, ExchangeInterface};

pub const BITTREX_API: &str = "https://bittrex.com/api/v1.1";
pub const BITTREX_PUBLIC_API: &str = "https://bittrex.com/api/v1.1/public";
/// port of the local bittrex simulator
pub const BITTREX_SIMULATION_PORT: u16 = 5300;

pub fn bittrex_interfaces() -> EnvironmentInterfaces<ExchangeInterface> {
    EnvironmentInterfaces::standard(
        ExchangeInterface::new(BITTREX_PUBLIC_API, BITTREX_API),
        ExchangeInterface::simulation(BITTREX_SIMULATION_PORT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bittrex_interfaces() {
        let interfaces = bittrex_interfaces();
        assert_eq!(interfaces.resolve("mainnet").authenticated_endpoint, BITTREX_API);
        assert_eq!(interfaces.resolve("unknown").public_endpoint, BITTREX_PUBLIC_API);
        assert_eq!(interfaces.resolve("simulation").public_endpoint, "http://127.0.0.1:5300");
    }
}
