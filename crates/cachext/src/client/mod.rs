//! Extended Redis client.
//!
//! [`ExtendedClient`] namespaces every key, encodes every value with its
//! [`Codec`], and routes commands through a [`CommandExecutor`]. The command
//! surface is split by family:
//!
//! - `keys`: strings, expiry, rename, flush
//! - `lists`: LPUSH/RPUSH/LPOP/RPOP/LRANGE/LINDEX/LINSERT
//! - `sorted_sets`: ZADD/ZCOUNT/ZRANGE/ZRANGEBYSCORE/ZREMRANGEBYSCORE/ZREM
//! - `scripts`: pattern bulk operations and the raw script surface
//! - `batch`: caller-owned pipelines and transactions

mod batch;
mod executor;
mod keys;
mod lists;
mod pool;
mod scripts;
mod sorted_sets;

use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{Cmd, FromRedisValue};
use serde::{de::DeserializeOwned, Serialize};

use cachext_core::cache::{
    validate_batch_size, Codec, JsonCodec, KeyBuilder, NamespacedKey, Result,
    DEFAULT_SCAN_BATCH_SIZE,
};

use crate::config::ClientConfig;

pub use batch::Batch;
pub use executor::CommandExecutor;
pub use pool::{ConnectionPool, Intent};
pub use scripts::{EvalTarget, PatternOptions};

use scripts::ScriptCache;

/// Redis client with namespaced keys, typed values and pattern bulk operations.
pub struct ExtendedClient<C = ConnectionManager, K = JsonCodec> {
    executor: CommandExecutor<C>,
    keys: KeyBuilder,
    scripts: ScriptCache,
    codec: K,
    scan_batch_size: usize,
}

impl<C: Clone, K: Clone> Clone for ExtendedClient<C, K> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            keys: self.keys.clone(),
            scripts: self.scripts.clone(),
            codec: self.codec.clone(),
            scan_batch_size: self.scan_batch_size,
        }
    }
}

impl ExtendedClient {
    /// Connects using `config`, with the default JSON codec.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid configuration, or
    /// `CacheError::ConnectionFailed` if the store cannot be reached.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let pool = ConnectionPool::connect(config).await?;
        Self::new(pool, config.key_builder(), JsonCodec).with_scan_batch_size(config.scan_batch_size)
    }
}

impl<C, K> ExtendedClient<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    pub fn new(pool: ConnectionPool<C>, keys: KeyBuilder, codec: K) -> Self {
        Self {
            executor: CommandExecutor::new(pool),
            scripts: ScriptCache::new(&keys),
            keys,
            codec,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
        }
    }

    /// Sets the default SCAN batch size for pattern operations.
    pub fn with_scan_batch_size(mut self, size: usize) -> Result<Self> {
        self.scan_batch_size = validate_batch_size(size)?;
        Ok(self)
    }

    /// A client that sends every command over `conn`, bypassing the pool.
    ///
    /// Used to run a sequence of calls on one caller-owned connection.
    pub fn bind<B>(&self, conn: B) -> ExtendedClient<B, K>
    where
        B: ConnectionLike + Clone + Send + Sync + 'static,
    {
        ExtendedClient {
            executor: CommandExecutor::new(ConnectionPool::new(conn)),
            keys: self.keys.clone(),
            scripts: self.scripts.clone(),
            codec: self.codec.clone(),
            scan_batch_size: self.scan_batch_size,
        }
    }

    /// A client whose keys carry `version` instead of the configured one.
    ///
    /// The script hash entries stay under the configured version, so every
    /// versioned view shares one cached procedure per command.
    pub fn with_version(&self, version: i64) -> Self {
        Self {
            keys: KeyBuilder::new(self.keys.prefix(), version),
            ..self.clone()
        }
    }

    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    pub fn codec(&self) -> &K {
        &self.codec
    }

    pub fn executor(&self) -> &CommandExecutor<C> {
        &self.executor
    }

    pub fn scan_batch_size(&self) -> usize {
        self.scan_batch_size
    }

    pub fn make_key(&self, key: &str) -> NamespacedKey {
        self.keys.make_key(key, None)
    }

    /// Runs an arbitrary command on the primary.
    ///
    /// Keys in `cmd` are sent as given; use [`make_key`](Self::make_key) to
    /// namespace them.
    pub async fn execute<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        self.executor.execute(cmd).await
    }

    /// Starts a batch of commands. With `transaction` the batch runs inside
    /// MULTI/EXEC.
    pub fn pipeline(&self, transaction: bool) -> Batch<'_, C, K> {
        Batch::new(self, transaction)
    }

    pub(crate) fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.codec.encode(value)?)
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(self.codec.decode(bytes)?)
    }

    pub(crate) fn decode_all<T: DeserializeOwned>(&self, items: Vec<Vec<u8>>) -> Result<Vec<T>> {
        items.iter().map(|bytes| self.decode(bytes)).collect()
    }
}
