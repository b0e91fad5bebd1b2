//! Pattern bulk operations and the raw script surface.
//!
//! A bulk operation runs a server-side procedure by hash. The hash lives in the
//! store itself under `proc__<command>__pattern`, so every client sharing the
//! keyspace compiles each procedure once:
//!
//! 1. `GET` the storage key. On a miss, `SCRIPT LOAD` the source and `SET` the hash.
//! 2. `EVALSHA hash 0 pattern batch`.
//! 3. If the store has forgotten the hash (`NOSCRIPT`), compile and retry once.

use redis::aio::ConnectionLike;
use redis::{FromRedisValue, ToRedisArgs};

use cachext_core::cache::{
    validate_batch_size, BulkCommand, CacheError, Codec, KeyBuilder, NamespacedKey, Result,
};

use super::ExtendedClient;

/// Per-call overrides for pattern operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Key version to match instead of the client's.
    pub version: Option<i64>,
    /// Key prefix to match instead of the client's.
    pub prefix: Option<String>,
    /// SCAN `COUNT` hint instead of the client's default.
    pub batch_size: Option<usize>,
}

impl PatternOptions {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: Some(batch_size),
            ..Self::default()
        }
    }
}

/// How [`ExtendedClient::eval`] identifies the script to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalTarget<'a> {
    /// Sends the source with `EVAL`.
    Source(&'a str),
    /// Runs a loaded script with `EVALSHA`.
    Sha(&'a str),
}

/// Where the compiled procedures' hashes are stored.
#[derive(Debug, Clone)]
pub(crate) struct ScriptCache {
    keys: KeyBuilder,
}

impl ScriptCache {
    pub(crate) fn new(keys: &KeyBuilder) -> Self {
        Self { keys: keys.clone() }
    }

    fn storage_key(&self, command: BulkCommand) -> NamespacedKey {
        self.keys.make_key(&command.storage_key(), None)
    }
}

impl<C, K> ExtendedClient<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    /// Deletes every key matching `pattern` with `DEL`.
    ///
    /// The pattern is namespaced like a key, so `"session:*"` only matches
    /// this client's sessions. Returns the number of keys removed, or `None`
    /// if the store returned no result.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` and `InvalidBatchSize` are returned before anything
    /// is sent.
    pub async fn delete_pattern(
        &self,
        pattern: &str,
        options: &PatternOptions,
    ) -> Result<Option<u64>> {
        self.run_pattern(BulkCommand::Delete, pattern, options).await
    }

    /// Like [`delete_pattern`](Self::delete_pattern), but with `UNLINK`, so
    /// memory is reclaimed in the background.
    pub async fn unlink_pattern(
        &self,
        pattern: &str,
        options: &PatternOptions,
    ) -> Result<Option<u64>> {
        self.run_pattern(BulkCommand::Unlink, pattern, options).await
    }

    async fn run_pattern(
        &self,
        command: BulkCommand,
        pattern: &str,
        options: &PatternOptions,
    ) -> Result<Option<u64>> {
        let batch = validate_batch_size(options.batch_size.unwrap_or(self.scan_batch_size))?;
        let pattern = self
            .keys
            .make_pattern(pattern, options.version, options.prefix.as_deref())?;

        let sha = match self.cached_sha(command).await? {
            Some(sha) => {
                tracing::trace!(command = command.command(), sha = %sha, "Script cache hit");
                sha
            }
            None => self.compile(command).await?,
        };

        let count = match self.evalsha_bulk(&sha, &pattern, batch).await {
            Err(CacheError::NoScript(_)) => {
                tracing::debug!(
                    command = command.command(),
                    sha = %sha,
                    "Script evicted from store, recompiling"
                );
                let sha = self.compile(command).await?;
                self.evalsha_bulk(&sha, &pattern, batch).await?
            }
            result => result?,
        };

        tracing::debug!(
            command = command.command(),
            pattern = %pattern,
            batch,
            count = ?count,
            "Pattern operation complete"
        );
        Ok(count)
    }

    /// Reads the stored hash. Always asks the primary, which is where
    /// `compile` writes it.
    async fn cached_sha(&self, command: BulkCommand) -> Result<Option<String>> {
        let key = self.scripts.storage_key(command);
        let stored: Option<Vec<u8>> = self
            .executor
            .execute(redis::cmd("GET").arg(key.as_str()))
            .await?;

        let Some(bytes) = stored else {
            return Ok(None);
        };
        match self.decode::<String>(&bytes) {
            Ok(sha) => Ok(Some(sha)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Ignoring undecodable script hash");
                Ok(None)
            }
        }
    }

    /// Loads the procedure and stores its hash.
    async fn compile(&self, command: BulkCommand) -> Result<String> {
        let sha = self.script_load(&command.script_source()).await?;

        let key = self.scripts.storage_key(command);
        let encoded = self.encode(&sha)?;
        let _: () = self
            .executor
            .execute(redis::cmd("SET").arg(key.as_str()).arg(encoded))
            .await?;

        tracing::debug!(command = command.command(), sha = %sha, key = %key, "Compiled script");
        Ok(sha)
    }

    async fn evalsha_bulk(
        &self,
        sha: &str,
        pattern: &NamespacedKey,
        batch: usize,
    ) -> Result<Option<u64>> {
        self.executor
            .execute(
                redis::cmd("EVALSHA")
                    .arg(sha)
                    .arg(0)
                    .arg(pattern.as_str())
                    .arg(batch),
            )
            .await
    }

    /// Runs a Lua script. `keys` are namespaced before they are sent; `args`
    /// are passed through unchanged.
    pub async fn eval<T, A>(&self, target: EvalTarget<'_>, keys: &[&str], args: &[A]) -> Result<T>
    where
        T: FromRedisValue,
        A: ToRedisArgs + Sync,
    {
        let mut cmd = match target {
            EvalTarget::Source(source) => {
                let mut cmd = redis::cmd("EVAL");
                cmd.arg(source);
                cmd
            }
            EvalTarget::Sha(sha) => {
                let mut cmd = redis::cmd("EVALSHA");
                cmd.arg(sha);
                cmd
            }
        };
        cmd.arg(keys.len());
        for key in keys {
            cmd.arg(self.make_key(key).as_str());
        }
        for arg in args {
            cmd.arg(arg);
        }
        self.executor.execute(&cmd).await
    }

    /// Loads a script without running it and returns its hash.
    pub async fn script_load(&self, source: &str) -> Result<String> {
        self.executor
            .execute(redis::cmd("SCRIPT").arg("LOAD").arg(source))
            .await
    }

    /// Reports which of `shas` the store currently knows.
    pub async fn script_exists(&self, shas: &[&str]) -> Result<Vec<bool>> {
        if shas.is_empty() {
            return Ok(Vec::new());
        }
        self.executor
            .execute(redis::cmd("SCRIPT").arg("EXISTS").arg(shas))
            .await
    }
}
