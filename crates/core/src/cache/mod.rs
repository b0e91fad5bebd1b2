mod error;
mod keys;
mod options;
mod patterns;
mod script;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{KeyBuilder, NamespacedKey, DEFAULT_VERSION, KEY_SEPARATOR};
pub use options::{
    unix_timestamp, validate_score, ExpiryArg, ListPosition, ScoreBound, ScoreRange, SetExpiry,
    ZAddFlags,
};
pub use patterns::{glob_escape, pattern_matches, validate_pattern};
pub use script::{
    validate_batch_size, BulkCommand, DEFAULT_SCAN_BATCH_SIZE, MAX_SCAN_BATCH_SIZE,
    KEYS_PER_CALL,
};
#[cfg(feature = "msgpack")]
pub use serialization::MsgPackCodec;
pub use serialization::{Codec, JsonCodec, SerializationError};
pub use traits::Cache;
