use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Byte-level cache surface consumed by framework cache-backend adapters.
///
/// Keys are logical keys; implementations apply their own namespacing.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    ///
    /// A TTL shorter than one millisecond (including `Duration::ZERO`) means
    /// the value expires immediately: it is not stored and any previous value
    /// under `key` is removed.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key. Returns true if the key existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Deletes all values matching a glob pattern (e.g., `"session:*"`).
    /// Returns the number of keys removed, if the store reported one.
    async fn delete_pattern(&self, pattern: &str) -> Result<Option<u64>>;
}
