//! Key CLI commands.

use chrono::{DateTime, Utc};
use clap::Parser;

/// When a key should expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireTime {
    /// A Unix timestamp, in seconds or milliseconds.
    Unix(i64),
    /// An RFC 3339 date and time.
    At(DateTime<Utc>),
}

/// Parses either a Unix timestamp or an RFC 3339 date and time.
pub fn parse_expire_time(value: &str) -> Result<ExpireTime, String> {
    if let Ok(timestamp) = value.parse::<i64>() {
        return Ok(ExpireTime::Unix(timestamp));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| ExpireTime::At(at.with_timezone(&Utc)))
        .map_err(|_| format!("expected a Unix timestamp or an RFC 3339 time, got {value:?}"))
}

/// Arguments for `expire-at`.
#[derive(Debug, Parser)]
pub struct ExpireAtArgs {
    /// Key to expire.
    pub key: String,
    /// Unix timestamp or RFC 3339 time (e.g. `2030-01-01T00:00:00Z`).
    #[arg(value_parser = parse_expire_time)]
    pub when: ExpireTime,
    /// Treat a Unix timestamp as milliseconds and use PEXPIREAT.
    #[arg(long)]
    pub millis: bool,
}

/// Arguments for `rename`.
#[derive(Debug, Parser)]
pub struct RenameArgs {
    /// Existing key.
    pub key: String,
    /// New name.
    pub new_key: String,
}
