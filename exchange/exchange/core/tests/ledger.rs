use eyre::Result;
use tempfile::{tempdir, TempDir};
use trading_exchange_core::storage::{Ledger, LedgerError, MAX_GET_TRADE_HISTORY};
use trading_model::model::{
    ActivityId, AllTradeHistory, ExchangeId, MiningStatus, Side, TokenPairId, TradeHistory, TxEntry,
    MILLISECONDS_PER_DAY,
};

fn open_ledger(name: &str) -> Result<(TempDir, Ledger)> {
    let dir = tempdir()?;
    let ledger = Ledger::open(&dir.path().join(name))?;
    Ok((dir, ledger))
}

fn trade(id: &str, timestamp: u64) -> TradeHistory {
    TradeHistory::new(id, 0.0021, 15.0, Side::Buy, timestamp)
}

fn snapshot(entries: Vec<(ExchangeId, &str, Vec<TradeHistory>)>) -> AllTradeHistory {
    let mut data = AllTradeHistory::new(0);
    for (exchange, pair, history) in entries {
        data.insert(exchange, TokenPairId::new(pair), history);
    }
    data
}

#[test]
fn test_trade_history_range_returns_exactly_records_in_bounds() -> Result<()> {
    let (_dir, ledger) = open_ledger("binance.db")?;
    let base = 1_530_000_000_000;
    ledger.store_trade_history(&snapshot(vec![
        (
            ExchangeId::Binance,
            "KNC-ETH",
            vec![trade("1", base - 1), trade("2", base), trade("3", base + 500), trade("4", base + 1_000), trade("5", base + 1_001)],
        ),
        (ExchangeId::Binance, "OMG-ETH", vec![trade("6", base + 10)]),
        (ExchangeId::Huobi, "KNC-ETH", vec![trade("7", base + 999)]),
    ]))?;

    let result = ledger.get_trade_history(base, base + 1_000)?;

    let knc = result.get(ExchangeId::Binance, &"KNC-ETH".into()).unwrap();
    let ids: Vec<&str> = knc.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3", "4"]);
    assert_eq!(result.get(ExchangeId::Binance, &"OMG-ETH".into()).unwrap().len(), 1);
    assert_eq!(result.get(ExchangeId::Huobi, &"KNC-ETH".into()).unwrap()[0].id, "7");
    assert_eq!(result.record_count(), 5);
    assert!(result.timestamp > 0);
    Ok(())
}

#[test]
fn test_trade_history_lists_registered_pairs_without_records() -> Result<()> {
    let (_dir, ledger) = open_ledger("huobi.db")?;
    ledger.store_trade_history(&snapshot(vec![(ExchangeId::Huobi, "EOS-ETH", vec![trade("1", 5)])]))?;

    let result = ledger.get_trade_history(1_000, 2_000)?;
    assert_eq!(result.get(ExchangeId::Huobi, &"EOS-ETH".into()), Some(&vec![]));
    Ok(())
}

#[test]
fn test_trade_history_rejects_broad_and_inverted_ranges() -> Result<()> {
    let (_dir, ledger) = open_ledger("binance.db")?;
    ledger.store_trade_history(&snapshot(vec![(ExchangeId::Binance, "KNC-ETH", vec![trade("1", 10)])]))?;

    assert!(ledger.get_trade_history(0, MAX_GET_TRADE_HISTORY).is_ok());
    let broad = ledger.get_trade_history(0, 3 * MILLISECONDS_PER_DAY + 1).unwrap_err();
    assert!(matches!(broad, LedgerError::RangeTooBroad { .. }));
    assert!(broad.is_query());
    let inverted = ledger.get_trade_history(100, 10).unwrap_err();
    assert!(matches!(inverted, LedgerError::InvalidRange { from: 100, to: 10 }));
    Ok(())
}

#[test]
fn test_trade_history_last_write_wins() -> Result<()> {
    let (_dir, ledger) = open_ledger("bittrex.db")?;
    let first = TradeHistory::new("a", 1.0, 1.0, Side::Buy, 42);
    let second = TradeHistory::new("b", 2.0, 3.0, Side::Sell, 42);
    ledger.store_trade_history(&snapshot(vec![(ExchangeId::Bittrex, "SALT-ETH", vec![first])]))?;
    ledger.store_trade_history(&snapshot(vec![(ExchangeId::Bittrex, "SALT-ETH", vec![second.clone()])]))?;

    let result = ledger.get_trade_history(0, 100)?;
    assert_eq!(result.get(ExchangeId::Bittrex, &"SALT-ETH".into()), Some(&vec![second]));
    Ok(())
}

#[test]
fn test_pending_intermediate_tx_store_list_remove() -> Result<()> {
    let (_dir, ledger) = open_ledger("huobi.db")?;
    let id = ActivityId::new(1_528_181_340_000, "0xdeposit|KNC|100");
    let other = ActivityId::new(1_528_181_340_001, "0xdeposit|ETH|1");
    let tx = TxEntry::new("0xhop", ExchangeId::Huobi, "KNC", 100.0, 1_528_181_340_000);
    ledger.store_pending_intermediate_tx(&id, &tx)?;
    ledger.store_pending_intermediate_tx(&other, &tx)?;

    let pending = ledger.get_pending_intermediate_txs()?;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending.get(&id), Some(&tx));

    ledger.remove_pending_intermediate_tx(&id)?;
    let pending = ledger.get_pending_intermediate_txs()?;
    assert!(!pending.contains_key(&id));
    assert!(pending.contains_key(&other));

    // removing twice is fine
    ledger.remove_pending_intermediate_tx(&id)?;
    Ok(())
}

#[test]
fn test_intermediate_tx_store_get_and_not_found() -> Result<()> {
    let (_dir, ledger) = open_ledger("huobi.db")?;
    let id = ActivityId::new(77, "deposit-77");
    let tx = TxEntry::new("0xsecond", ExchangeId::Huobi, "ETH", 0.5, 77).with_mining_status(MiningStatus::Mined);
    ledger.store_intermediate_tx(&id, &tx)?;
    assert_eq!(ledger.get_intermediate_tx(&id)?, tx);

    // a neighbouring key exists after the seek point but is not the target
    let missing = ActivityId::new(77, "deposit-7");
    let err = ledger.get_intermediate_tx(&missing).unwrap_err();
    assert!(matches!(err, LedgerError::IntermediateTxNotFound(ref id) if *id == missing));
    assert!(err.to_string().contains("please try later"));
    Ok(())
}

#[test]
fn test_one_activity_id_addresses_both_partitions() -> Result<()> {
    let (_dir, ledger) = open_ledger("huobi.db")?;
    let id = ActivityId::new(9, "0xabc|OMG|3");
    let tx = TxEntry::new("0xhop", ExchangeId::Huobi, "OMG", 3.0, 9);
    ledger.store_pending_intermediate_tx(&id, &tx)?;
    let (pending_id, pending_tx) = ledger.get_pending_intermediate_txs()?.into_iter().next().unwrap();
    ledger.store_intermediate_tx(&pending_id, &pending_tx)?;
    assert_eq!(ledger.get_intermediate_tx(&id)?, tx);
    Ok(())
}

#[test]
fn test_deposit_with_full_tx_hash_round_trips_both_partitions() -> Result<()> {
    let (_dir, ledger) = open_ledger("huobi.db")?;
    let hash = format!("0x{}", "5b2e1f0c9a7d3e64".repeat(4));
    let id = ActivityId::new(1_528_181_340_000, format!("{hash}|KNC|100.5"));
    let tx = TxEntry::new(hash.as_str(), ExchangeId::Huobi, "KNC", 100.5, id.timepoint);

    ledger.store_pending_intermediate_tx(&id, &tx)?;
    let pending = ledger.get_pending_intermediate_txs()?;
    assert_eq!(pending.get(&id), Some(&tx));

    let mined = tx.clone().with_mining_status(MiningStatus::Mined);
    ledger.confirm_intermediate_tx(&id, &mined)?;
    assert!(ledger.get_pending_intermediate_txs()?.is_empty());
    assert_eq!(ledger.get_intermediate_tx(&id)?, mined);

    ledger.store_intermediate_tx(&id, &tx)?;
    assert_eq!(ledger.get_intermediate_tx(&id)?, tx);
    Ok(())
}

#[test]
fn test_last_id_is_the_latest_trade() -> Result<()> {
    let (_dir, ledger) = open_ledger("binance.db")?;
    let pair = TokenPairId::new("KNC-ETH");
    ledger.store_trade_history(&snapshot(vec![
        (ExchangeId::Binance, "KNC-ETH", vec![trade("old", 100), trade("newest", 300), trade("mid", 200)]),
        (ExchangeId::Binance, "KNC-ETHX", vec![trade("other-pair", 400)]),
    ]))?;
    assert_eq!(ledger.get_last_id_trade_history(ExchangeId::Binance, &pair)?.as_deref(), Some("newest"));
    Ok(())
}

#[test]
fn test_last_id_on_empty_pair_registers_namespace() -> Result<()> {
    let (_dir, ledger) = open_ledger("binance.db")?;
    let pair = TokenPairId::new("ZRX-ETH");
    assert_eq!(ledger.get_last_id_trade_history(ExchangeId::Binance, &pair)?, None);
    assert_eq!(ledger.get_last_id_trade_history(ExchangeId::Binance, &pair)?, None);

    assert_eq!(ledger.trade_history_namespaces()?, vec![(ExchangeId::Binance, pair.clone())]);
    let result = ledger.get_trade_history(0, 10)?;
    assert_eq!(result.get(ExchangeId::Binance, &pair), Some(&vec![]));
    Ok(())
}
