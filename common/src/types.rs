// Core candle data types - JSON-serializable and stable on the wire
use serde::{Deserialize, Serialize};

/// A single OHLC candle. `time` is the bucket start as a unix timestamp in
/// seconds; prices are quoted as token1/token0 for the canonical pair order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Candle periods the API accepts, in seconds: 5m, 15m, 1h, 4h, 1d, 1w.
pub const ALLOWED_INTERVALS: [i64; 6] = [300, 900, 3600, 14400, 86400, 604800];

/// Checked form of an EVM address: `0x` followed by exactly 40 hex digits.
/// Checksummed and lowercase inputs both pass; normalization to lowercase is
/// left to the caller.
pub fn is_address(value: &str) -> bool {
    let Some(hex) = value.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}
