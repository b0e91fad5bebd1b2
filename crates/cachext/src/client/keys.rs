//! Plain values, expiry and whole-key operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use redis::aio::ConnectionLike;
use redis::Value;
use serde::{de::DeserializeOwned, Serialize};

use cachext_core::cache::{unix_timestamp, Codec, Result, SetExpiry};

use super::ExtendedClient;

impl<C, K> ExtendedClient<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    /// Gets and decodes a value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_bytes(key).await? {
            Some(bytes) => Ok(Some(self.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Gets the stored bytes without decoding them.
    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = self.make_key(key);
        self.executor
            .execute_read(redis::cmd("GET").arg(key.as_str()))
            .await
    }

    /// Encodes and stores a value, with an optional time to live.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let encoded = self.encode(value)?;
        self.set_bytes(key, &encoded, ttl).await
    }

    /// Stores bytes as they are. A `ttl` has millisecond resolution.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a `ttl` under one millisecond, before anything is
    /// sent. The [`Cache`](cachext_core::cache::Cache) implementation treats
    /// such a ttl as immediate expiry instead.
    pub async fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let expiry = ttl.map(|ttl| SetExpiry::after(ttl).in_millis());
        self.store(key, value, expiry.unwrap_or_default()).await?;
        Ok(())
    }

    /// Encodes and stores a value with an absolute or relative expiry.
    ///
    /// An absolute timestamp takes precedence over a relative duration.
    /// Returns whether the store accepted the write.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the relative duration rounds to zero in the chosen
    /// unit.
    pub async fn set_with_expiry<T>(&self, key: &str, value: &T, expiry: SetExpiry) -> Result<bool>
    where
        T: Serialize + Sync + ?Sized,
    {
        let encoded = self.encode(value)?;
        self.store(key, &encoded, expiry).await
    }

    async fn store(&self, key: &str, value: &[u8], expiry: SetExpiry) -> Result<bool> {
        let expiry = expiry.resolve()?;
        let key = self.make_key(key);

        let mut cmd = redis::cmd("SET");
        cmd.arg(key.as_str()).arg(value);
        if let Some(expiry) = expiry {
            cmd.arg(expiry.option()).arg(expiry.value());
        }

        let reply: Value = self.executor.execute(&cmd).await?;
        Ok(!matches!(reply, Value::Nil))
    }

    /// Deletes a key. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let key = self.make_key(key);
        let removed: i64 = self
            .executor
            .execute(redis::cmd("DEL").arg(key.as_str()))
            .await?;
        Ok(removed > 0)
    }

    pub async fn has_key(&self, key: &str) -> Result<bool> {
        let key = self.make_key(key);
        let found: i64 = self
            .executor
            .execute_read(redis::cmd("EXISTS").arg(key.as_str()))
            .await?;
        Ok(found > 0)
    }

    /// Renames `key` to `new_key`, replacing any value under `new_key`.
    ///
    /// Returns `false`, leaving the store untouched, if `key` does not exist.
    pub async fn rename(&self, key: &str, new_key: &str) -> Result<bool> {
        let source = self.make_key(key);
        let exists: i64 = self
            .executor
            .execute(redis::cmd("EXISTS").arg(source.as_str()))
            .await?;
        if exists == 0 {
            tracing::debug!(key = %source, "Rename skipped, source key absent");
            return Ok(false);
        }

        let target = self.make_key(new_key);
        let _: () = self
            .executor
            .execute(redis::cmd("RENAME").arg(source.as_str()).arg(target.as_str()))
            .await?;
        Ok(true)
    }

    /// Expires `key` at a Unix timestamp, in seconds (`EXPIREAT`) or
    /// milliseconds (`PEXPIREAT`).
    ///
    /// Returns `false` if the key does not exist.
    pub async fn expire_at(&self, key: &str, timestamp: i64, millis: bool) -> Result<bool> {
        let key = self.make_key(key);
        let command = if millis { "PEXPIREAT" } else { "EXPIREAT" };
        let set: i64 = self
            .executor
            .execute(redis::cmd(command).arg(key.as_str()).arg(timestamp))
            .await?;
        Ok(set == 1)
    }

    /// [`expire_at`](Self::expire_at) for a point in time.
    pub async fn expire_at_time(&self, key: &str, at: DateTime<Utc>, millis: bool) -> Result<bool> {
        self.expire_at(key, unix_timestamp(at, millis), millis).await
    }

    /// Removes every key in the selected database, including other
    /// namespaces and the stored script hashes.
    pub async fn clear(&self) -> Result<()> {
        tracing::warn!("Flushing cache database");
        self.executor.execute(&redis::cmd("FLUSHDB")).await
    }
}
