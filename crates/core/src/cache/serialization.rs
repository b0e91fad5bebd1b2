//! Value codecs for cache storage.
//!
//! Every value the client stores passes through a [`Codec`]. Members of lists
//! and sorted sets are encoded one by one, so the codec only ever sees a single
//! application value at a time.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::CacheError;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        match err {
            SerializationError::SerializeFailed(msg) => CacheError::Serialization(msg),
            SerializationError::DeserializeFailed(msg) => CacheError::Deserialization(msg),
        }
    }
}

/// Converts application values to the bytes stored in Redis and back.
///
/// Implementations must satisfy `decode(encode(v)) == v` for every value they
/// accept.
pub trait Codec: Send + Sync + 'static {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, SerializationError>
    where
        T: Serialize + ?Sized;

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, SerializationError>
    where
        T: DeserializeOwned;
}

/// JSON codec.
///
/// Human-readable values that are easy to inspect with `redis-cli`. Integers
/// are stored as their decimal digits, so counters stay compatible with
/// `INCR`/`DECR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, SerializationError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, SerializationError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
    }
}

/// MessagePack codec. Compact binary values, not INCR-compatible.
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

#[cfg(feature = "msgpack")]
impl Codec for MsgPackCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, SerializationError>
    where
        T: Serialize + ?Sized,
    {
        rmp_serde::to_vec_named(value)
            .map_err(|e| SerializationError::SerializeFailed(e.to_string()))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, SerializationError>
    where
        T: DeserializeOwned,
    {
        rmp_serde::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
    }
}
