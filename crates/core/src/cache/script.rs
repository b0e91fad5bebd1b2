//! Server-side procedures for pattern-based bulk operations.
//!
//! The procedure walks the keyspace with `SCAN` in bounded batches and applies
//! a single command to every match, so neither the store nor the network ever
//! sees an unbounded key listing. Arguments are passed as `ARGV[1]` (the
//! namespaced pattern) and `ARGV[2]` (the SCAN `COUNT` hint).

use super::{CacheError, Result};

/// Default SCAN `COUNT` hint for pattern operations.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 50_000;

/// Largest SCAN `COUNT` hint accepted from callers.
pub const MAX_SCAN_BATCH_SIZE: usize = 1_000_000;

/// Keys handed to a single `redis.call` inside the procedure. Lua's `unpack`
/// is limited by the C stack, so larger SCAN pages are applied in chunks.
pub const KEYS_PER_CALL: usize = 1_000;

/// The command a pattern operation applies to each matching key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkCommand {
    /// `DEL`: removal blocks until memory is reclaimed.
    Delete,
    /// `UNLINK`: memory is reclaimed in the background.
    Unlink,
}

impl BulkCommand {
    pub fn command(self) -> &'static str {
        match self {
            BulkCommand::Delete => "DEL",
            BulkCommand::Unlink => "UNLINK",
        }
    }

    /// Logical key under which the compiled procedure's hash is stored.
    pub fn storage_key(self) -> String {
        format!("proc__{}__pattern", self.command().to_lowercase())
    }

    /// Lua source of the procedure for this command.
    pub fn script_source(self) -> String {
        format!(
            r#"redis.replicate_commands()
local pattern = ARGV[1]
local batch = tonumber(ARGV[2])
local chunk = {chunk}
local cursor = "0"
local count = 0
repeat
    local page = redis.call("SCAN", cursor, "MATCH", pattern, "COUNT", batch)
    cursor = page[1]
    local keys = page[2]
    for first = 1, #keys, chunk do
        local last = math.min(first + chunk - 1, #keys)
        count = count + redis.call("{command}", unpack(keys, first, last))
    end
until cursor == "0"
return count
"#,
            chunk = KEYS_PER_CALL,
            command = self.command()
        )
    }
}

/// Checks a SCAN batch size supplied by a caller.
pub fn validate_batch_size(size: usize) -> Result<usize> {
    if size == 0 || size > MAX_SCAN_BATCH_SIZE {
        return Err(CacheError::InvalidBatchSize {
            size,
            max: MAX_SCAN_BATCH_SIZE,
        });
    }
    Ok(size)
}
