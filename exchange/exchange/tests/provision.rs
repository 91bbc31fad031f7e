use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{bail, Result};
use parking_lot::Mutex;
use trading_exchange::error::ProvisionError;
use trading_exchange::model::{CoreExchange, DepositAddressAssignment, TokenResolver};
use trading_exchange::provision::provision_deposit_addresses;
use trading_model::model::{ExchangeId, PairPrecision, Token};

/// Records every update; finishes them in reverse submission order.
#[derive(Default)]
struct RecordingExchange {
    updates: Mutex<Vec<(String, String)>>,
    fail_token: Option<&'static str>,
}

#[async_trait]
impl CoreExchange for RecordingExchange {
    fn id(&self) -> ExchangeId {
        ExchangeId::Binance
    }
    async fn update_deposit_address(&self, token: &Token, address: &str) -> Result<()> {
        let index: u64 = address.trim_start_matches("0x").parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(50 - index * 4)).await;
        self.updates.lock().push((token.id.clone(), address.to_string()));
        if self.fail_token == Some(token.id.as_str()) {
            bail!("exchange rejected the address");
        }
        Ok(())
    }
    async fn update_pairs_precision(&self) -> Result<()> {
        Ok(())
    }
    fn deposit_address(&self, _token: &str) -> Option<String> {
        None
    }
    fn min_deposit(&self, _token: &str) -> Option<f64> {
        None
    }
    fn pairs(&self) -> Vec<PairPrecision> {
        vec![]
    }
}

struct Tokens;
impl TokenResolver for Tokens {
    fn get_internal_token_by_id(&self, id: &str) -> Result<Token> {
        if id.starts_with("UNKNOWN") {
            bail!("{id} is not an internal token");
        }
        Ok(Token::new(id, "", 18))
    }
}

fn assignments(k: usize) -> Vec<DepositAddressAssignment> {
    (0..k)
        .map(|i| DepositAddressAssignment::new(format!("TOKEN{i}"), format!("0x{i}")))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_one_update_per_assignment() -> Result<()> {
    for k in [0, 1, 7, 12] {
        let exchange = Arc::new(RecordingExchange::default());
        provision_deposit_addresses(exchange.clone(), assignments(k), Arc::new(Tokens)).await?;

        let updates: BTreeMap<String, String> = exchange.updates.lock().iter().cloned().collect();
        assert_eq!(exchange.updates.lock().len(), k);
        let expected: BTreeMap<String, String> = assignments(k)
            .into_iter()
            .map(|assignment| (assignment.token, assignment.address))
            .collect();
        assert_eq!(updates, expected);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_update_is_not_an_error() -> Result<()> {
    let exchange = Arc::new(RecordingExchange {
        fail_token: Some("TOKEN2"),
        ..Default::default()
    });
    provision_deposit_addresses(exchange.clone(), assignments(5), Arc::new(Tokens)).await?;
    assert_eq!(exchange.updates.lock().len(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_token_fails_after_all_tasks_join() -> Result<()> {
    let exchange = Arc::new(RecordingExchange::default());
    let mut work = assignments(4);
    work.insert(2, DepositAddressAssignment::new("UNKNOWN_TOKEN", "0x9"));

    let err = provision_deposit_addresses(exchange.clone(), work, Arc::new(Tokens))
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::UnknownToken { ref token, .. } if token == "UNKNOWN_TOKEN"));
    assert!(err.to_string().contains("Can't get internal token UNKNOWN_TOKEN"));
    assert_eq!(exchange.updates.lock().len(), 4);
    Ok(())
}
