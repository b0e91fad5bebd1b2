//! Degrade-instead-of-fail wrapper around [`ExtendedClient`].
//!
//! [`ExtendedCache`] exposes the same operations as the client. Each one runs
//! through [`ExtendedCache::guard`], which, when the policy says so, turns a
//! failed exchange with the store into the operation's empty result. Errors
//! raised before anything was sent (bad arguments, unencodable values) and
//! stored bytes the codec cannot read always reach the caller.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{Cmd, FromRedisValue, ToRedisArgs, Value};
use serde::{de::DeserializeOwned, Serialize};

use cachext_core::cache::{
    Cache, Codec, JsonCodec, ListPosition, Result, ScoreRange, SetExpiry, ZAddFlags,
};

use crate::client::{Batch, EvalTarget, ExtendedClient, PatternOptions};
use crate::config::ClientConfig;

/// What to do when the store cannot be reached or rejects a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Return the operation's default value instead of the error.
    pub ignore_exceptions: bool,
    /// Log each swallowed error at `warn` level.
    pub log_ignored_exceptions: bool,
}

impl ErrorPolicy {
    /// Every error reaches the caller.
    pub fn strict() -> Self {
        Self {
            ignore_exceptions: false,
            log_ignored_exceptions: true,
        }
    }

    /// Store failures are logged and swallowed.
    pub fn lenient() -> Self {
        Self {
            ignore_exceptions: true,
            log_ignored_exceptions: true,
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// An [`ExtendedClient`] whose store failures are handled by an [`ErrorPolicy`].
pub struct ExtendedCache<C = ConnectionManager, K = JsonCodec> {
    client: ExtendedClient<C, K>,
    policy: ErrorPolicy,
}

impl<C: Clone, K: Clone> Clone for ExtendedCache<C, K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            policy: self.policy,
        }
    }
}

impl ExtendedCache {
    /// Connects with `config`, taking the error policy from it as well.
    ///
    /// Connecting is never subject to the policy: a configuration that cannot
    /// produce a client is reported.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let client = ExtendedClient::connect(config).await?;
        Ok(Self::new(client, config.error_policy()))
    }
}

impl<C, K> ExtendedCache<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    pub fn new(client: ExtendedClient<C, K>, policy: ErrorPolicy) -> Self {
        Self { client, policy }
    }

    /// The unguarded client.
    pub fn client(&self) -> &ExtendedClient<C, K> {
        &self.client
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Awaits `operation`, applying the error policy to its outcome.
    pub async fn guard<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        T: Default,
        F: Future<Output = Result<T>>,
    {
        match future.await {
            Err(err) if err.is_transport() && self.policy.ignore_exceptions => {
                if self.policy.log_ignored_exceptions {
                    tracing::warn!(operation, error = %err, "Ignoring cache failure");
                }
                Ok(T::default())
            }
            result => result,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.guard("get", self.client.get(key)).await
    }

    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.guard("get", self.client.get_bytes(key)).await
    }

    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.guard("set", self.client.set(key, value, ttl)).await
    }

    pub async fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.guard("set", self.client.set_bytes(key, value, ttl)).await
    }

    pub async fn set_with_expiry<T>(&self, key: &str, value: &T, expiry: SetExpiry) -> Result<bool>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.guard("set", self.client.set_with_expiry(key, value, expiry))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.guard("delete", self.client.delete(key)).await
    }

    pub async fn has_key(&self, key: &str) -> Result<bool> {
        self.guard("has_key", self.client.has_key(key)).await
    }

    pub async fn rename(&self, key: &str, new_key: &str) -> Result<bool> {
        self.guard("rename", self.client.rename(key, new_key)).await
    }

    pub async fn expire_at(&self, key: &str, timestamp: i64, millis: bool) -> Result<bool> {
        self.guard("expire_at", self.client.expire_at(key, timestamp, millis))
            .await
    }

    pub async fn expire_at_time(&self, key: &str, at: DateTime<Utc>, millis: bool) -> Result<bool> {
        self.guard("expire_at", self.client.expire_at_time(key, at, millis))
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.guard("clear", self.client.clear()).await
    }

    pub async fn lpush<T: Serialize + Sync>(&self, key: &str, values: &[T]) -> Result<i64> {
        self.guard("lpush", self.client.lpush(key, values)).await
    }

    pub async fn rpush<T: Serialize + Sync>(&self, key: &str, values: &[T]) -> Result<i64> {
        self.guard("rpush", self.client.rpush(key, values)).await
    }

    pub async fn lpop<T: DeserializeOwned>(&self, key: &str, count: usize) -> Result<Vec<T>> {
        self.guard("lpop", self.client.lpop(key, count)).await
    }

    pub async fn rpop<T: DeserializeOwned>(&self, key: &str, count: usize) -> Result<Vec<T>> {
        self.guard("rpop", self.client.rpop(key, count)).await
    }

    pub async fn lrange<T: DeserializeOwned>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<T>> {
        self.guard("lrange", self.client.lrange(key, start, stop)).await
    }

    pub async fn lindex<T: DeserializeOwned>(&self, key: &str, index: isize) -> Result<Option<T>> {
        self.guard("lindex", self.client.lindex(key, index)).await
    }

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
        self.guard(
            "linsert",
            self.client.linsert(key, position, reference, value),
        )
        .await
    }

    pub async fn zadd<M: Serialize + Sync>(
        &self,
        key: &str,
        members: &[(M, f64)],
        flags: ZAddFlags,
    ) -> Result<u64> {
        self.guard("zadd", self.client.zadd(key, members, flags)).await
    }

    pub async fn zcount(&self, key: &str, range: ScoreRange) -> Result<u64> {
        self.guard("zcount", self.client.zcount(key, range)).await
    }

    pub async fn zrange<M: DeserializeOwned>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
    ) -> Result<Vec<M>> {
        self.guard("zrange", self.client.zrange(key, start, stop, rev))
            .await
    }

    pub async fn zrange_with_scores<M, S>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
        cast: impl Fn(f64) -> S + Send,
    ) -> Result<Vec<(M, S)>>
    where
        M: DeserializeOwned,
    {
        self.guard(
            "zrange",
            self.client.zrange_with_scores(key, start, stop, rev, cast),
        )
        .await
    }

    pub async fn zrange_by_score<M: DeserializeOwned>(
        &self,
        key: &str,
        range: ScoreRange,
        limit: Option<(usize, usize)>,
    ) -> Result<Vec<M>> {
        self.guard(
            "zrange_by_score",
            self.client.zrange_by_score(key, range, limit),
        )
        .await
    }

    pub async fn zrange_by_score_with_scores<M, S>(
        &self,
        key: &str,
        range: ScoreRange,
        limit: Option<(usize, usize)>,
        cast: impl Fn(f64) -> S + Send,
    ) -> Result<Vec<(M, S)>>
    where
        M: DeserializeOwned,
    {
        self.guard(
            "zrange_by_score",
            self.client
                .zrange_by_score_with_scores(key, range, limit, cast),
        )
        .await
    }

    pub async fn zrem_range_by_score(&self, key: &str, range: ScoreRange) -> Result<u64> {
        self.guard(
            "zrem_range_by_score",
            self.client.zrem_range_by_score(key, range),
        )
        .await
    }

    pub async fn zrem<M: Serialize + Sync>(&self, key: &str, members: &[M]) -> Result<u64> {
        self.guard("zrem", self.client.zrem(key, members)).await
    }

    pub async fn delete_pattern(
        &self,
        pattern: &str,
        options: &PatternOptions,
    ) -> Result<Option<u64>> {
        self.guard("delete_pattern", self.client.delete_pattern(pattern, options))
            .await
    }

    pub async fn unlink_pattern(
        &self,
        pattern: &str,
        options: &PatternOptions,
    ) -> Result<Option<u64>> {
        self.guard("unlink_pattern", self.client.unlink_pattern(pattern, options))
            .await
    }

    pub async fn eval<T, A>(&self, target: EvalTarget<'_>, keys: &[&str], args: &[A]) -> Result<T>
    where
        T: FromRedisValue + Default,
        A: ToRedisArgs + Sync,
    {
        self.guard("eval", self.client.eval(target, keys, args)).await
    }

    pub async fn script_load(&self, source: &str) -> Result<String> {
        self.guard("script_load", self.client.script_load(source))
            .await
    }

    pub async fn script_exists(&self, shas: &[&str]) -> Result<Vec<bool>> {
        self.guard("script_exists", self.client.script_exists(shas))
            .await
    }

    pub async fn execute<T: FromRedisValue + Default>(&self, cmd: &Cmd) -> Result<T> {
        self.guard("execute", self.client.execute(cmd)).await
    }

    /// Starts a batch on the underlying client; send it with
    /// [`execute_batch`](Self::execute_batch) to apply the policy.
    pub fn pipeline(&self, transaction: bool) -> Batch<'_, C, K> {
        self.client.pipeline(transaction)
    }

    pub async fn execute_batch(&self, batch: Batch<'_, C, K>) -> Result<Vec<Value>> {
        self.guard("pipeline", batch.execute()).await
    }
}

#[async_trait]
impl<C, K> Cache for ExtendedCache<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_bytes(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        if ttl.is_some_and(|ttl| ttl.as_millis() == 0) {
            Self::delete(self, key).await?;
            return Ok(());
        }
        self.set_bytes(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Self::delete(self, key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<Option<u64>> {
        Self::delete_pattern(self, pattern, &PatternOptions::default()).await
    }
}
