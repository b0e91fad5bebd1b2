//! List commands. Elements are encoded one by one.

use redis::aio::ConnectionLike;
use serde::{de::DeserializeOwned, Serialize};

use cachext_core::cache::{CacheError, Codec, ListPosition, Result};

use super::ExtendedClient;

impl<C, K> ExtendedClient<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    /// Prepends `values` (the last value ends up at the head). Returns the
    /// new length of the list.
    pub async fn lpush<T>(&self, key: &str, values: &[T]) -> Result<i64>
    where
        T: Serialize + Sync,
    {
        self.push("LPUSH", key, values).await
    }

    /// Appends `values`. Returns the new length of the list.
    pub async fn rpush<T>(&self, key: &str, values: &[T]) -> Result<i64>
    where
        T: Serialize + Sync,
    {
        self.push("RPUSH", key, values).await
    }

    async fn push<T>(&self, command: &str, key: &str, values: &[T]) -> Result<i64>
    where
        T: Serialize + Sync,
    {
        let encoded = self.encode_members(command, values)?;
        let key = self.make_key(key);
        self.executor
            .execute(redis::cmd(command).arg(key.as_str()).arg(encoded))
            .await
    }

    /// Removes and returns up to `count` elements from the head.
    ///
    /// An absent key yields an empty vector.
    pub async fn lpop<T: DeserializeOwned>(&self, key: &str, count: usize) -> Result<Vec<T>> {
        self.pop("LPOP", key, count).await
    }

    /// Removes and returns up to `count` elements from the tail, last first.
    pub async fn rpop<T: DeserializeOwned>(&self, key: &str, count: usize) -> Result<Vec<T>> {
        self.pop("RPOP", key, count).await
    }

    async fn pop<T: DeserializeOwned>(
        &self,
        command: &str,
        key: &str,
        count: usize,
    ) -> Result<Vec<T>> {
        let key = self.make_key(key);
        let popped: Option<Vec<Vec<u8>>> = self
            .executor
            .execute(redis::cmd(command).arg(key.as_str()).arg(count))
            .await?;
        self.decode_all(popped.unwrap_or_default())
    }

    /// Elements between `start` and `stop`, both inclusive. Negative indexes
    /// count from the tail, so `lrange(key, 0, -1)` returns the whole list.
    pub async fn lrange<T: DeserializeOwned>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<T>> {
        let key = self.make_key(key);
        let items: Vec<Vec<u8>> = self
            .executor
            .execute_read(redis::cmd("LRANGE").arg(key.as_str()).arg(start).arg(stop))
            .await?;
        self.decode_all(items)
    }

    pub async fn lindex<T: DeserializeOwned>(&self, key: &str, index: isize) -> Result<Option<T>> {
        let key = self.make_key(key);
        let item: Option<Vec<u8>> = self
            .executor
            .execute_read(redis::cmd("LINDEX").arg(key.as_str()).arg(index))
            .await?;
        item.map(|bytes| self.decode(&bytes)).transpose()
    }

    /// Inserts `value` before or after the first element equal to `reference`.
    ///
    /// Returns the new length, `-1` if `reference` was not found, or `0` if
    /// the key does not exist.
    pub async fn linsert<R, T>(
        &self,
        key: &str,
        position: ListPosition,
        reference: &R,
        value: &T,
    ) -> Result<i64>
    where
        R: Serialize + Sync + ?Sized,
        T: Serialize + Sync + ?Sized,
    {
        let reference = self.encode(reference)?;
        let value = self.encode(value)?;
        let key = self.make_key(key);
        self.executor
            .execute(
                redis::cmd("LINSERT")
                    .arg(key.as_str())
                    .arg(position.as_str())
                    .arg(reference)
                    .arg(value),
            )
            .await
    }

    /// Encodes every member of a collection command, rejecting an empty set
    /// of members since the store would refuse the command anyway.
    pub(crate) fn encode_members<T: Serialize>(
        &self,
        command: &str,
        values: &[T],
    ) -> Result<Vec<Vec<u8>>> {
        if values.is_empty() {
            return Err(CacheError::InvalidArgument(format!(
                "{command} requires at least one value"
            )));
        }
        values.iter().map(|value| self.encode(value)).collect()
    }
}
