use byteorder::{BigEndian, ByteOrder};
use trading_model::model::{TimeStampMs, MILLISECONDS_PER_DAY};

use crate::storage::LedgerError;

pub const INTERMEDIATE_TX: &str = "intermediate_tx";
pub const PENDING_INTERMEDIATE_TX: &str = "pending_intermediate_tx";
pub const TRADE_HISTORY: &str = "trade_history";
/// registry of every (exchange, pair) namespace of [`TRADE_HISTORY`]
pub const TRADE_HISTORY_PAIRS: &str = "trade_history_pairs";
/// widest span accepted by a trade-history range query
pub const MAX_GET_TRADE_HISTORY: TimeStampMs = 3 * MILLISECONDS_PER_DAY;

const LEN_PREFIX: usize = 2;
const TIMESTAMP_LEN: usize = 8;

fn push_component(buf: &mut Vec<u8>, component: &str) -> Result<(), LedgerError> {
    let len = u16::try_from(component.len()).map_err(|_| LedgerError::NamespaceTooLong(component.len()))?;
    let mut len_bytes = [0u8; LEN_PREFIX];
    BigEndian::write_u16(&mut len_bytes, len);
    buf.extend_from_slice(&len_bytes);
    buf.extend_from_slice(component.as_bytes());
    Ok(())
}

/// `u16be(len) exchange | u16be(len) pair`
///
/// Length prefixes keep namespaces prefix-free, so a key belongs to a
/// namespace exactly when it starts with that namespace's prefix.
pub fn trade_history_prefix(exchange: &str, pair: &str) -> Result<Vec<u8>, LedgerError> {
    let mut buf = Vec::with_capacity(2 * LEN_PREFIX + exchange.len() + pair.len() + TIMESTAMP_LEN);
    push_component(&mut buf, exchange)?;
    push_component(&mut buf, pair)?;
    Ok(buf)
}

pub fn trade_history_key(prefix: &[u8], timestamp: TimeStampMs) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + TIMESTAMP_LEN);
    key.extend_from_slice(prefix);
    let mut ts = [0u8; TIMESTAMP_LEN];
    BigEndian::write_u64(&mut ts, timestamp);
    key.extend_from_slice(&ts);
    key
}

fn take_component(buf: &[u8]) -> Result<(&str, &[u8]), LedgerError> {
    let malformed = || LedgerError::MalformedKey(buf.len());
    if buf.len() < LEN_PREFIX {
        return Err(malformed());
    }
    let len = BigEndian::read_u16(&buf[..LEN_PREFIX]) as usize;
    let rest = &buf[LEN_PREFIX..];
    if rest.len() < len {
        return Err(malformed());
    }
    let component = std::str::from_utf8(&rest[..len]).map_err(|_| malformed())?;
    Ok((component, &rest[len..]))
}

/// Inverse of [`trade_history_prefix`].
pub fn split_trade_history_prefix(prefix: &[u8]) -> Result<(&str, &str), LedgerError> {
    let (exchange, rest) = take_component(prefix)?;
    let (pair, rest) = take_component(rest)?;
    if !rest.is_empty() {
        return Err(LedgerError::MalformedKey(prefix.len()));
    }
    Ok((exchange, pair))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_history_keys_order_by_timestamp_within_pair() {
        let prefix = trade_history_prefix("binance", "KNC-ETH").unwrap();
        let early = trade_history_key(&prefix, 255);
        let late = trade_history_key(&prefix, 256);
        assert!(early < late);
        assert!(early.starts_with(&prefix));
        assert_eq!(early.len(), prefix.len() + 8);
    }

    #[test]
    fn test_trade_history_prefixes_do_not_nest() {
        let short = trade_history_prefix("huobi", "OMG-ETH").unwrap();
        let longer = trade_history_prefix("huobi", "OMG-ETHX").unwrap();
        assert!(!longer.starts_with(&short));
        let shifted = trade_history_prefix("huobiO", "MG-ETH").unwrap();
        assert_ne!(short, shifted);
    }

    #[test]
    fn test_split_trade_history_prefix() {
        let prefix = trade_history_prefix("bittrex", "SALT-ETH").unwrap();
        assert_eq!(split_trade_history_prefix(&prefix).unwrap(), ("bittrex", "SALT-ETH"));
        assert!(split_trade_history_prefix(&prefix[..prefix.len() - 1]).is_err());
        assert!(matches!(
            trade_history_prefix(&"x".repeat(70_000), "KNC-ETH"),
            Err(LedgerError::NamespaceTooLong(70_000))
        ));
    }
}
