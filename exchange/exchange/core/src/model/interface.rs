use std::collections::HashMap;

/// env tag every table must carry; unknown tags resolve to it
pub const DEV_MODE: &str = "dev";
pub const SIMULATION_MODE: &str = "simulation";
/// env tags that talk to the real exchange
pub const REAL_MODES: [&str; 5] = ["production", "mainnet", "staging", "ropsten", "kovan"];

/// Per-environment table of one exchange's endpoint configuration.
#[derive(Debug, Clone)]
pub struct EnvironmentInterfaces<I> {
    dev: I,
    entries: HashMap<String, I>,
}

impl<I> EnvironmentInterfaces<I> {
    pub fn new(dev: I) -> Self {
        Self {
            dev,
            entries: HashMap::new(),
        }
    }
    pub fn with(mut self, env: impl Into<String>, interface: I) -> Self {
        self.insert(env, interface);
        self
    }
    pub fn insert(&mut self, env: impl Into<String>, interface: I) {
        let env = env.into();
        if env == DEV_MODE {
            self.dev = interface;
        } else {
            self.entries.insert(env, interface);
        }
    }
    /// Real endpoints for dev and every tag in [`REAL_MODES`], the simulator
    /// for [`SIMULATION_MODE`].
    pub fn standard(real: I, simulation: I) -> Self
    where
        I: Clone,
    {
        let mut table = Self::new(real.clone());
        for env in REAL_MODES {
            table.insert(env, real.clone());
        }
        table.insert(SIMULATION_MODE, simulation);
        table
    }
    /// The entry for `env`, or the dev entry when there is none.
    pub fn resolve(&self, env: &str) -> &I {
        self.entries.get(env).unwrap_or(&self.dev)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeInterface {
    pub public_endpoint: String,
    pub authenticated_endpoint: String,
}

impl ExchangeInterface {
    pub fn new(public_endpoint: impl Into<String>, authenticated_endpoint: impl Into<String>) -> Self {
        Self {
            public_endpoint: public_endpoint.into(),
            authenticated_endpoint: authenticated_endpoint.into(),
        }
    }
    /// local simulator listening on `port`
    pub fn simulation(port: u16) -> Self {
        let url = format!("http://127.0.0.1:{port}");
        Self::new(url.clone(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_dev() {
        let interfaces = EnvironmentInterfaces::new(ExchangeInterface::new("https://real", "https://real"))
            .with("simulation", ExchangeInterface::simulation(5100));
        assert_eq!(interfaces.resolve("simulation").public_endpoint, "http://127.0.0.1:5100");
        assert_eq!(interfaces.resolve("dev").public_endpoint, "https://real");
        assert_eq!(interfaces.resolve("no_such_env").public_endpoint, "https://real");
        assert_eq!(interfaces.resolve("").public_endpoint, "https://real");
    }

    #[test]
    fn test_standard_table_covers_real_modes() {
        let interfaces = EnvironmentInterfaces::standard("real", "sim");
        for env in REAL_MODES {
            assert_eq!(*interfaces.resolve(env), "real");
        }
        assert_eq!(*interfaces.resolve(SIMULATION_MODE), "sim");
    }

    #[test]
    fn test_insert_dev_replaces_fallback() {
        let mut interfaces = EnvironmentInterfaces::new(1);
        interfaces.insert(DEV_MODE, 2);
        assert_eq!(*interfaces.resolve("staging"), 2);
    }
}
