//! Per-exchange embedded ledger: the two-phase intermediate transaction
//! record and the time-series trade-history index, backed by LMDB.

mod error;
mod keys;
mod ledger;

pub use error::*;
pub use keys::*;
pub use ledger::*;
