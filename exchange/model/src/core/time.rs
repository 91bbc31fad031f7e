use chrono::Utc;

pub type TimeStampMs = u64;

pub const MILLISECONDS_PER_SECOND: u64 = 1_000;
pub const MILLISECONDS_PER_DAY: u64 = 86_400 * MILLISECONDS_PER_SECOND;

/// current unix time in milliseconds
pub fn now_ms() -> TimeStampMs {
    Utc::now().timestamp_millis().max(0) as TimeStampMs
}
