//! Redis error mapping to CacheError.

use cachext_core::cache::CacheError;
use redis::ErrorKind;

/// Maps Redis errors to CacheError.
///
/// Connection-level failures become `ConnectionFailed`, a `NOSCRIPT` reply
/// becomes `NoScript`, and every other server or protocol error becomes
/// `OperationFailed`.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.kind() == ErrorKind::NoScriptError {
        CacheError::NoScript(err.to_string())
    } else if err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_io_error()
    {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
