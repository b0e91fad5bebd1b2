//! Caller-owned pipelines and transactions.

use std::time::Duration;

use redis::aio::ConnectionLike;
use redis::{Pipeline, Value};
use serde::Serialize;

use cachext_core::cache::{validate_score, CacheError, Codec, Result, SetExpiry, ZAddFlags};

use super::ExtendedClient;

/// A batch of commands sent in one round trip.
///
/// Keys are namespaced and values encoded as commands are queued, so encoding
/// errors surface at the call that queued the value. Nothing is sent until
/// [`execute`](Self::execute); dropping the batch discards it.
///
/// ```ignore
/// let mut batch = client.pipeline(true);
/// batch.set("a", &1, None)?.rpush("log", &["a set"])?;
/// let replies = batch.execute().await?;
/// ```
pub struct Batch<'a, C, K> {
    client: &'a ExtendedClient<C, K>,
    pipe: Pipeline,
    queued: usize,
}

impl<'a, C, K> Batch<'a, C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    pub(crate) fn new(client: &'a ExtendedClient<C, K>, transaction: bool) -> Self {
        let mut pipe = redis::pipe();
        if transaction {
            pipe.atomic();
        }
        Self {
            client,
            pipe,
            queued: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.queued
    }

    pub fn is_empty(&self) -> bool {
        self.queued == 0
    }

    pub fn set<T>(&mut self, key: &str, value: &T, ttl: Option<Duration>) -> Result<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let expiry = ttl
            .map(|ttl| SetExpiry::after(ttl).in_millis().resolve())
            .transpose()?
            .flatten();
        let encoded = self.client.encode(value)?;

        let pipe = self.pipe.cmd("SET");
        pipe.arg(self.client.make_key(key).as_str()).arg(encoded);
        if let Some(expiry) = expiry {
            pipe.arg(expiry.option()).arg(expiry.value());
        }
        self.queued += 1;
        Ok(self)
    }

    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.pipe.cmd("DEL").arg(self.client.make_key(key).as_str());
        self.queued += 1;
        self
    }

    pub fn expire_at(&mut self, key: &str, timestamp: i64, millis: bool) -> &mut Self {
        let command = if millis { "PEXPIREAT" } else { "EXPIREAT" };
        self.pipe
            .cmd(command)
            .arg(self.client.make_key(key).as_str())
            .arg(timestamp);
        self.queued += 1;
        self
    }

    pub fn lpush<T: Serialize>(&mut self, key: &str, values: &[T]) -> Result<&mut Self> {
        self.push("LPUSH", key, values)
    }

    pub fn rpush<T: Serialize>(&mut self, key: &str, values: &[T]) -> Result<&mut Self> {
        self.push("RPUSH", key, values)
    }

    fn push<T: Serialize>(&mut self, command: &str, key: &str, values: &[T]) -> Result<&mut Self> {
        let encoded = self.client.encode_members(command, values)?;
        self.pipe
            .cmd(command)
            .arg(self.client.make_key(key).as_str())
            .arg(encoded);
        self.queued += 1;
        Ok(self)
    }

    pub fn zadd<M: Serialize>(
        &mut self,
        key: &str,
        members: &[(M, f64)],
        flags: ZAddFlags,
    ) -> Result<&mut Self> {
        let condition = flags.to_arg()?;
        let mut args = Vec::with_capacity(members.len());
        for (member, score) in members {
            args.push((validate_score(*score)?, self.client.encode(member)?));
        }
        if args.is_empty() {
            return Err(CacheError::InvalidArgument(
                "ZADD requires at least one member".to_string(),
            ));
        }

        let pipe = self.pipe.cmd("ZADD");
        pipe.arg(self.client.make_key(key).as_str());
        if let Some(condition) = condition {
            pipe.arg(condition);
        }
        for (score, member) in args {
            pipe.arg(score).arg(member);
        }
        self.queued += 1;
        Ok(self)
    }

    pub fn zrem<M: Serialize>(&mut self, key: &str, members: &[M]) -> Result<&mut Self> {
        let encoded = self.client.encode_members("ZREM", members)?;
        self.pipe
            .cmd("ZREM")
            .arg(self.client.make_key(key).as_str())
            .arg(encoded);
        self.queued += 1;
        Ok(self)
    }

    /// Sends the batch and returns one reply per queued command, in order.
    ///
    /// An empty batch returns immediately without contacting the store.
    pub async fn execute(self) -> Result<Vec<Value>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        tracing::trace!(commands = self.queued, "Executing batch");
        self.client.executor.execute_pipeline(&self.pipe).await
    }
}
