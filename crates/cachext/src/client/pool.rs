//! Connection routing by read/write intent.

use std::sync::Arc;

use rand::Rng;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};

use cachext_core::cache::{CacheError, Result};

use crate::config::ClientConfig;
use crate::error::map_redis_error;

/// Whether a command may run on a read replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
}

/// Hands out connections for each command.
///
/// Connections are cheap handles onto multiplexed connections, so every
/// command clones its own and nothing is held between commands. Writes always
/// go to the primary; reads go to a random replica when any are configured.
pub struct ConnectionPool<C> {
    primary: C,
    replicas: Arc<[C]>,
}

impl<C: Clone> Clone for ConnectionPool<C> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            replicas: Arc::clone(&self.replicas),
        }
    }
}

impl<C: Clone> ConnectionPool<C> {
    /// A pool with a single connection used for reads and writes.
    pub fn new(primary: C) -> Self {
        Self::with_replicas(primary, Vec::new())
    }

    pub fn with_replicas(primary: C, replicas: Vec<C>) -> Self {
        Self {
            primary,
            replicas: replicas.into(),
        }
    }

    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    pub fn get(&self, intent: Intent) -> C {
        match intent {
            Intent::Read if !self.replicas.is_empty() => {
                let index = rand::rng().random_range(0..self.replicas.len());
                self.replicas[index].clone()
            }
            _ => self.primary.clone(),
        }
    }
}

impl ConnectionPool<ConnectionManager> {
    /// Opens managed connections to the primary and every configured replica.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if a connection cannot be established.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let primary = open(&config.url, config).await?;
        let mut replicas = Vec::with_capacity(config.replica_urls.len());
        for url in &config.replica_urls {
            replicas.push(open(url, config).await?);
        }

        tracing::debug!(
            url = %config.url,
            replicas = replicas.len(),
            "Connected to cache"
        );
        Ok(Self::with_replicas(primary, replicas))
    }
}

/// Opens a managed connection to `url`.
///
/// `connect_timeout` bounds the whole attempt, including the manager's own
/// reconnect backoff, so an unreachable store fails promptly.
async fn open(url: &str, config: &ClientConfig) -> Result<ConnectionManager> {
    let client = redis::Client::open(url).map_err(map_redis_error)?;

    let mut manager_config = ConnectionManagerConfig::new();
    if let Some(timeout) = config.response_timeout {
        manager_config = manager_config.set_response_timeout(timeout);
    }

    let Some(deadline) = config.connect_timeout else {
        return ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(map_redis_error);
    };
    manager_config = manager_config.set_connection_timeout(deadline);

    tokio::time::timeout(deadline, ConnectionManager::new_with_config(client, manager_config))
        .await
        .map_err(|_| {
            CacheError::ConnectionFailed(format!(
                "no connection within {}ms",
                deadline.as_millis()
            ))
        })?
        .map_err(map_redis_error)
}
