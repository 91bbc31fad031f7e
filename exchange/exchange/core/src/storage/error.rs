use std::path::PathBuf;

use thiserror::Error;
use trading_model::model::{ActivityId, ActivityIdError, TimeStampMs};

use crate::storage::MAX_GET_TRADE_HISTORY;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("lmdb: {0}")]
    Lmdb(#[from] lmdb::Error),
    #[error("cannot prepare ledger location {path}: {error}")]
    Io { path: PathBuf, error: std::io::Error },
    #[error("ledger value codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    ActivityId(#[from] ActivityIdError),
    #[error("Can not find 2nd transaction tx for the deposit {0}, please try later")]
    IntermediateTxNotFound(ActivityId),
    #[error("Time range is too broad, it must be smaller or equal to {MAX_GET_TRADE_HISTORY} ms, got {from}..{to}")]
    RangeTooBroad { from: TimeStampMs, to: TimeStampMs },
    #[error("invalid time range: to {to} is before from {from}")]
    InvalidRange { from: TimeStampMs, to: TimeStampMs },
    #[error("trade history namespace component is {0} bytes long")]
    NamespaceTooLong(usize),
    #[error("malformed trade history key of {0} bytes")]
    MalformedKey(usize),
}

impl LedgerError {
    /// Rejected queries: nothing was read and the caller may retry with
    /// other arguments.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::IntermediateTxNotFound(_) | Self::RangeTooBroad { .. } | Self::InvalidRange { .. }
        )
    }
}
