use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TimeStampMs;

const TIMEPOINT_LEN: usize = 8;
/// LMDB's default maximum key size
pub const MAX_ACTIVITY_KEY_LEN: usize = 511;
/// longest `eid` that fits into the canonical key
pub const MAX_EID_LEN: usize = MAX_ACTIVITY_KEY_LEN - TIMEPOINT_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityIdError {
    #[error("activity eid is {0} bytes long, at most {MAX_EID_LEN} bytes fit into a key")]
    EidTooLong(usize),
    #[error("activity key must be at least {TIMEPOINT_LEN} bytes, got {0}")]
    KeyTooShort(usize),
    #[error("activity key eid is not valid utf-8")]
    InvalidUtf8,
}

/// Identifier of one tracked operation (deposit, withdrawal, trade leg).
///
/// Equality is field equality. Storage uses a single canonical key: the
/// 8-byte big-endian `timepoint` followed by the raw `eid` bytes, so keys
/// sort by timepoint first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId {
    pub timepoint: TimeStampMs,
    pub eid: String,
}

impl ActivityId {
    pub fn new(timepoint: TimeStampMs, eid: impl Into<String>) -> Self {
        Self {
            timepoint,
            eid: eid.into(),
        }
    }

    pub fn to_key(&self) -> Result<Vec<u8>, ActivityIdError> {
        let eid = self.eid.as_bytes();
        if eid.len() > MAX_EID_LEN {
            return Err(ActivityIdError::EidTooLong(eid.len()));
        }
        let mut key = vec![0u8; TIMEPOINT_LEN + eid.len()];
        BigEndian::write_u64(&mut key[..TIMEPOINT_LEN], self.timepoint);
        key[TIMEPOINT_LEN..].copy_from_slice(eid);
        Ok(key)
    }

    pub fn from_key(key: &[u8]) -> Result<Self, ActivityIdError> {
        if key.len() < TIMEPOINT_LEN {
            return Err(ActivityIdError::KeyTooShort(key.len()));
        }
        let timepoint = BigEndian::read_u64(&key[..TIMEPOINT_LEN]);
        let eid = std::str::from_utf8(&key[TIMEPOINT_LEN..]).map_err(|_| ActivityIdError::InvalidUtf8)?;
        Ok(Self::new(timepoint, eid))
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.timepoint, self.eid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_key_decodes_to_the_same_id() {
        let id = ActivityId::new(1_528_181_340_000, "0x8c2b6c3e|ETH|1.5");
        let key = id.to_key().unwrap();
        assert_eq!(&key[..8], &1_528_181_340_000u64.to_be_bytes());
        assert_eq!(ActivityId::from_key(&key).unwrap(), id);
    }

    #[test]
    fn test_activity_keys_sort_by_timepoint() {
        let early = ActivityId::new(1_000, "zzz").to_key().unwrap();
        let late = ActivityId::new(2_000, "aaa").to_key().unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_activity_key_holds_a_full_deposit_eid() {
        let eid = format!("0x{}|KNC|100.5", "8c2b6c3e".repeat(8));
        let id = ActivityId::new(1_528_181_340_000, eid.as_str());
        let key = id.to_key().unwrap();
        assert_eq!(key.len(), 8 + eid.len());
        assert_eq!(ActivityId::from_key(&key).unwrap(), id);
    }

    #[test]
    fn test_activity_key_length_limits() {
        let long = ActivityId::new(1, "x".repeat(MAX_EID_LEN + 1));
        assert_eq!(long.to_key(), Err(ActivityIdError::EidTooLong(MAX_EID_LEN + 1)));
        assert_eq!(ActivityId::new(1, "x".repeat(MAX_EID_LEN)).to_key().unwrap().len(), MAX_ACTIVITY_KEY_LEN);
        assert_eq!(ActivityId::from_key(&[0u8; 5]), Err(ActivityIdError::KeyTooShort(5)));
        let mut key = ActivityId::new(7, "ab").to_key().unwrap();
        key.push(0xff);
        assert_eq!(ActivityId::from_key(&key), Err(ActivityIdError::InvalidUtf8));
    }

    #[test]
    fn test_activity_eid_prefix_is_a_distinct_key() {
        let short = ActivityId::new(7, "0xab").to_key().unwrap();
        let long = ActivityId::new(7, "0xab|ETH").to_key().unwrap();
        assert_ne!(short, long);
        assert!(short < long);
    }

    #[test]
    fn test_activity_json_and_key_identify_the_same_activity() {
        let id = ActivityId::new(42, "deposit-1");
        let from_json: ActivityId = serde_json::from_str(&serde_json::to_string(&id).unwrap()).unwrap();
        let from_key = ActivityId::from_key(&id.to_key().unwrap()).unwrap();
        assert_eq!(from_json, from_key);
    }
}
