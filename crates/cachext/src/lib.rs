//! Extended Redis cache client.
//!
//! Adds to a plain Redis connection:
//!
//! - namespaced keys (`prefix:version:key`) and codec-encoded values
//! - pattern deletion (`DEL` or `UNLINK`) run server-side by a cached script
//!   that walks the keyspace with `SCAN`
//! - typed list and sorted-set commands, absolute expiry, rename
//! - [`ExtendedCache`], which can turn store outages into empty results
//!
//! ```ignore
//! use cachext::{ClientConfig, ExtendedCache, PatternOptions};
//!
//! let cache = ExtendedCache::connect(&ClientConfig::from_env()).await?;
//! cache.set("session:1", &"alice", None).await?;
//! let removed = cache.delete_pattern("session:*", &PatternOptions::default()).await?;
//! ```

pub mod client;
pub mod config;
mod error;
pub mod resilience;

#[cfg(test)]
mod testing;

pub use cachext_core::cache::{
    Cache, CacheError, Codec, JsonCodec, KeyBuilder, ListPosition, NamespacedKey, Result,
    ScoreBound, ScoreRange, SetExpiry, ZAddFlags,
};
#[cfg(feature = "msgpack")]
pub use cachext_core::cache::MsgPackCodec;
pub use client::{Batch, EvalTarget, ExtendedClient, PatternOptions};
pub use config::ClientConfig;
pub use error::map_redis_error;
pub use resilience::{ErrorPolicy, ExtendedCache};
