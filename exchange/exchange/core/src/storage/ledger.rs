use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use common::utils::truncate_lossy;
use lmdb::{Cursor, Database, DatabaseFlags, Environment, EnvironmentFlags, Transaction, WriteFlags};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use trading_model::model::{
    now_ms, ActivityId, AllTradeHistory, ExchangeId, TimeStampMs, TokenPairId, TradeHistory, TxEntry,
};

use crate::storage::{
    split_trade_history_prefix, trade_history_key, trade_history_prefix, LedgerError, INTERMEDIATE_TX,
    MAX_GET_TRADE_HISTORY, PENDING_INTERMEDIATE_TX, TRADE_HISTORY, TRADE_HISTORY_PAIRS,
};

const MAX_DBS: u32 = 4;
const MAP_SIZE: usize = 1024 * 1024 * 1024;

fn decode<T: DeserializeOwned>(value: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(value).map_err(|err| {
        warn!(value = %truncate_lossy(value), "cannot decode ledger value: {err}");
        LedgerError::Codec(err)
    })
}

/// LMDB-backed ledger of one exchange.
///
/// Every public call runs in its own transaction: read-only for queries,
/// read-write for mutations. LMDB serializes writers and gives readers a
/// snapshot, so the ledger holds no lock of its own.
pub struct Ledger {
    env: Environment,
    path: PathBuf,
    /// confirmed intermediate txs: ActivityId key (timepoint + eid) -> TxEntry
    intermediate_tx_db: Database,
    /// pending intermediate txs: ActivityId key (timepoint + eid) -> TxEntry
    pending_intermediate_tx_db: Database,
    /// trades: exchange | pair | u64be timestamp -> TradeHistory
    trade_history_db: Database,
    /// namespaces: exchange | pair -> empty
    trade_history_pairs_db: Database,
}

impl Ledger {
    /// Open or create the single-file ledger at `path`. All databases are
    /// created if missing, so reopening an existing file is harmless.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| LedgerError::Io {
                path: parent.to_path_buf(),
                error,
            })?;
        }
        let env = Environment::new()
            .set_flags(EnvironmentFlags::NO_SUB_DIR)
            .set_max_dbs(MAX_DBS)
            .set_map_size(MAP_SIZE)
            .open_with_permissions(path, 0o600)?;

        let intermediate_tx_db = env.create_db(Some(INTERMEDIATE_TX), DatabaseFlags::empty())?;
        let pending_intermediate_tx_db = env.create_db(Some(PENDING_INTERMEDIATE_TX), DatabaseFlags::empty())?;
        let trade_history_db = env.create_db(Some(TRADE_HISTORY), DatabaseFlags::empty())?;
        let trade_history_pairs_db = env.create_db(Some(TRADE_HISTORY_PAIRS), DatabaseFlags::empty())?;
        info!(path = %path.display(), "opened ledger");

        Ok(Self {
            env,
            path: path.to_path_buf(),
            intermediate_tx_db,
            pending_intermediate_tx_db,
            trade_history_db,
            trade_history_pairs_db,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_pending_intermediate_tx(&self, id: &ActivityId, tx: &TxEntry) -> Result<(), LedgerError> {
        let key = id.to_key()?;
        let value = serde_json::to_vec(tx)?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.pending_intermediate_tx_db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!(%id, hash = %tx.hash, "stored pending intermediate tx");
        Ok(())
    }

    /// Removing an id that is not pending is a no-op.
    pub fn remove_pending_intermediate_tx(&self, id: &ActivityId) -> Result<(), LedgerError> {
        let key = id.to_key()?;
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.pending_intermediate_tx_db, &key, None) {
            Ok(()) => {}
            Err(lmdb::Error::NotFound) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
        txn.commit()?;
        debug!(%id, "removed pending intermediate tx");
        Ok(())
    }

    pub fn get_pending_intermediate_txs(&self) -> Result<HashMap<ActivityId, TxEntry>, LedgerError> {
        let txn = self.env.begin_ro_txn()?;
        let mut cursor = txn.open_ro_cursor(self.pending_intermediate_tx_db)?;
        let mut result = HashMap::new();
        for item in cursor.iter_start() {
            let (key, value) = item?;
            result.insert(ActivityId::from_key(key)?, decode(value)?);
        }
        Ok(result)
    }

    pub fn store_intermediate_tx(&self, id: &ActivityId, tx: &TxEntry) -> Result<(), LedgerError> {
        let key = id.to_key()?;
        let value = serde_json::to_vec(tx)?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.intermediate_tx_db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!(%id, hash = %tx.hash, "stored intermediate tx");
        Ok(())
    }

    /// Promote an activity from pending to confirmed in a single transaction.
    /// `tx` replaces whatever was pending under `id`; a missing pending entry
    /// is not an error.
    pub fn confirm_intermediate_tx(&self, id: &ActivityId, tx: &TxEntry) -> Result<(), LedgerError> {
        let key = id.to_key()?;
        let value = serde_json::to_vec(tx)?;
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.pending_intermediate_tx_db, &key, None) {
            Ok(()) | Err(lmdb::Error::NotFound) => {}
            Err(err) => return Err(err.into()),
        }
        txn.put(self.intermediate_tx_db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!(%id, hash = %tx.hash, "confirmed intermediate tx");
        Ok(())
    }

    pub fn get_intermediate_tx(&self, id: &ActivityId) -> Result<TxEntry, LedgerError> {
        let key = id.to_key()?;
        let txn = self.env.begin_ro_txn()?;
        match txn.get(self.intermediate_tx_db, &key) {
            Ok(value) => decode(value),
            Err(lmdb::Error::NotFound) => Err(LedgerError::IntermediateTxNotFound(id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    /// Upsert every record of `data`, keyed by (exchange, pair, timestamp).
    /// A record with an already stored timestamp replaces the old one.
    pub fn store_trade_history(&self, data: &AllTradeHistory) -> Result<(), LedgerError> {
        let mut txn = self.env.begin_rw_txn()?;
        for (exchange, history) in &data.data {
            for (pair, records) in history {
                let prefix = trade_history_prefix(exchange.ticker(), pair.as_str())?;
                txn.put(self.trade_history_pairs_db, &prefix, b"", WriteFlags::empty())?;
                for record in records {
                    let key = trade_history_key(&prefix, record.timestamp);
                    let value = serde_json::to_vec(record)?;
                    txn.put(self.trade_history_db, &key, &value, WriteFlags::empty())?;
                }
            }
        }
        txn.commit()?;
        debug!(records = data.record_count(), "stored trade history");
        Ok(())
    }

    /// Every registered (exchange, pair) with its trades in `[from, to]`,
    /// ascending by timestamp. Registered pairs without trades in range are
    /// present with an empty list.
    pub fn get_trade_history(&self, from: TimeStampMs, to: TimeStampMs) -> Result<AllTradeHistory, LedgerError> {
        if to < from {
            return Err(LedgerError::InvalidRange { from, to });
        }
        if to - from > MAX_GET_TRADE_HISTORY {
            return Err(LedgerError::RangeTooBroad { from, to });
        }
        let mut result = AllTradeHistory::new(now_ms());
        let txn = self.env.begin_ro_txn()?;
        let mut namespaces = txn.open_ro_cursor(self.trade_history_pairs_db)?;
        let trades = txn.open_ro_cursor(self.trade_history_db)?;
        for item in namespaces.iter_start() {
            let (prefix, _) = item?;
            let (exchange, pair) = split_trade_history_prefix(prefix)?;
            let Ok(exchange) = exchange.parse::<ExchangeId>() else {
                warn!(exchange, pair, "skipping trade history of unknown exchange");
                continue;
            };
            let start = trade_history_key(prefix, from);
            let end = trade_history_key(prefix, to);
            let mut records = Vec::new();
            let mut next = trades.get(Some(start.as_slice()), None, lmdb_sys::MDB_SET_RANGE);
            loop {
                match next {
                    Ok((Some(key), value)) if key.starts_with(prefix) && key <= end.as_slice() => {
                        records.push(decode::<TradeHistory>(value)?);
                    }
                    Ok(_) | Err(lmdb::Error::NotFound) => break,
                    Err(err) => return Err(err.into()),
                }
                next = trades.get(None, None, lmdb_sys::MDB_NEXT);
            }
            result.insert(exchange, TokenPairId::new(pair), records);
        }
        Ok(result)
    }

    /// Register the (exchange, pair) namespace. Idempotent.
    pub fn ensure_trade_history_namespace(&self, exchange: ExchangeId, pair: &TokenPairId) -> Result<(), LedgerError> {
        let prefix = trade_history_prefix(exchange.ticker(), pair.as_str())?;
        let mut txn = self.env.begin_rw_txn()?;
        match txn.get(self.trade_history_pairs_db, &prefix) {
            Ok(_) => return Ok(()),
            Err(lmdb::Error::NotFound) => {}
            Err(err) => return Err(err.into()),
        }
        txn.put(self.trade_history_pairs_db, &prefix, b"", WriteFlags::empty())?;
        txn.commit()?;
        debug!(%exchange, %pair, "created trade history namespace");
        Ok(())
    }

    pub fn trade_history_namespaces(&self) -> Result<Vec<(ExchangeId, TokenPairId)>, LedgerError> {
        let txn = self.env.begin_ro_txn()?;
        let mut cursor = txn.open_ro_cursor(self.trade_history_pairs_db)?;
        let mut result = Vec::new();
        for item in cursor.iter_start() {
            let (prefix, _) = item?;
            let (exchange, pair) = split_trade_history_prefix(prefix)?;
            if let Ok(exchange) = exchange.parse() {
                result.push((exchange, TokenPairId::new(pair)));
            }
        }
        Ok(result)
    }

    /// Id of the trade with the greatest timestamp, without touching the
    /// namespace registry.
    pub fn last_trade_history_id(&self, exchange: ExchangeId, pair: &TokenPairId) -> Result<Option<String>, LedgerError> {
        let prefix = trade_history_prefix(exchange.ticker(), pair.as_str())?;
        let upper = trade_history_key(&prefix, TimeStampMs::MAX);
        let txn = self.env.begin_ro_txn()?;
        let cursor = txn.open_ro_cursor(self.trade_history_db)?;
        // land on the greatest key <= upper
        let last = match cursor.get(Some(upper.as_slice()), None, lmdb_sys::MDB_SET_RANGE) {
            Ok((Some(key), value)) if key == upper.as_slice() => Ok((Some(key), value)),
            Ok(_) => cursor.get(None, None, lmdb_sys::MDB_PREV),
            Err(lmdb::Error::NotFound) => cursor.get(None, None, lmdb_sys::MDB_LAST),
            Err(err) => Err(err),
        };
        match last {
            Ok((Some(key), value)) if key.starts_with(&prefix) => {
                let record: TradeHistory = decode(value)?;
                Ok(Some(record.id))
            }
            Ok(_) | Err(lmdb::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Id of the latest stored trade of (exchange, pair), `None` when the
    /// pair has none.
    ///
    /// Registers the namespace first, so after this call the pair shows up
    /// in [`Ledger::get_trade_history`] even if it never had a trade.
    pub fn get_last_id_trade_history(&self, exchange: ExchangeId, pair: &TokenPairId) -> Result<Option<String>, LedgerError> {
        self.ensure_trade_history_namespace(exchange, pair)?;
        self.last_trade_history_id(exchange, pair)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").field("path", &self.path).finish()
    }
}
