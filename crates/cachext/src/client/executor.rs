//! Single entry point for every command the client sends.

use redis::aio::ConnectionLike;
use redis::{Cmd, FromRedisValue, Pipeline};

use cachext_core::cache::Result;

use super::pool::{ConnectionPool, Intent};
use crate::error::map_redis_error;

/// Sends commands over connections taken from a [`ConnectionPool`].
///
/// Commands run on a write-capable connection unless the caller explicitly
/// asks for a read, so nothing with side effects can land on a replica.
pub struct CommandExecutor<C> {
    pool: ConnectionPool<C>,
}

impl<C: Clone> Clone for CommandExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl<C> CommandExecutor<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    pub fn new(pool: ConnectionPool<C>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool<C> {
        &self.pool
    }

    /// Runs a command on the primary.
    pub async fn execute<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        self.run(cmd, Intent::Write).await
    }

    /// Runs a read-only command, on a replica if one is configured.
    pub async fn execute_read<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        self.run(cmd, Intent::Read).await
    }

    /// Runs a pipeline (or MULTI/EXEC transaction) on the primary.
    pub async fn execute_pipeline<T: FromRedisValue>(&self, pipeline: &Pipeline) -> Result<T> {
        let mut conn = self.pool.get(Intent::Write);
        let reply = pipeline
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(reply)
    }

    async fn run<T: FromRedisValue>(&self, cmd: &Cmd, intent: Intent) -> Result<T> {
        let mut conn = self.pool.get(intent);
        let reply = cmd.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(reply)
    }
}
