use std::{env, time::Duration};

use cachext_core::cache::{
    validate_batch_size, CacheError, KeyBuilder, Result, DEFAULT_SCAN_BATCH_SIZE,
    DEFAULT_VERSION,
};

use crate::resilience::ErrorPolicy;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Primary (write) connection URL (default: "redis://localhost:6379")
    pub url: String,
    /// Read replica URLs; read-only commands are spread across these (default: none)
    pub replica_urls: Vec<String>,
    /// Prefix for every key (default: "")
    pub key_prefix: String,
    /// Default key version (default: 1)
    pub version: i64,
    /// SCAN COUNT hint for pattern operations (default: 50,000)
    pub scan_batch_size: usize,
    /// Swallow store failures instead of returning them (default: false)
    pub ignore_exceptions: bool,
    /// Log swallowed failures (default: true)
    pub log_ignored_exceptions: bool,
    /// Bound on establishing each connection, reconnect retries included (default: none)
    pub connect_timeout: Option<Duration>,
    /// Per-command response timeout (default: none)
    pub response_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHEXT_URL` - Primary connection URL (default: "redis://localhost:6379")
    /// - `CACHEXT_REPLICA_URLS` - Comma-separated replica URLs (default: none)
    /// - `CACHEXT_KEY_PREFIX` - Key prefix (default: "")
    /// - `CACHEXT_VERSION` - Default key version (default: 1)
    /// - `CACHEXT_SCAN_BATCH_SIZE` - SCAN COUNT hint (default: 50,000)
    /// - `CACHEXT_IGNORE_EXCEPTIONS` - Swallow store failures (default: false)
    /// - `CACHEXT_LOG_IGNORED_EXCEPTIONS` - Log swallowed failures (default: true)
    /// - `CACHEXT_CONNECT_TIMEOUT_MS` - Connect timeout in milliseconds (default: none)
    /// - `CACHEXT_RESPONSE_TIMEOUT_MS` - Response timeout in milliseconds (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |name: &str| lookup(name).and_then(|v| parse_flag(&v));

        Self {
            url: lookup("CACHEXT_URL").unwrap_or(defaults.url),
            replica_urls: lookup("CACHEXT_REPLICA_URLS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            key_prefix: lookup("CACHEXT_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            version: lookup("CACHEXT_VERSION")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.version),
            scan_batch_size: lookup("CACHEXT_SCAN_BATCH_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.scan_batch_size),
            ignore_exceptions: flag("CACHEXT_IGNORE_EXCEPTIONS")
                .unwrap_or(defaults.ignore_exceptions),
            log_ignored_exceptions: flag("CACHEXT_LOG_IGNORED_EXCEPTIONS")
                .unwrap_or(defaults.log_ignored_exceptions),
            connect_timeout: lookup("CACHEXT_CONNECT_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis),
            response_timeout: lookup("CACHEXT_RESPONSE_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis),
        }
    }

    /// Checks values that would otherwise only fail on first use.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(CacheError::InvalidArgument(
                "connection URL must not be empty".to_string(),
            ));
        }
        validate_batch_size(self.scan_batch_size)?;
        Ok(())
    }

    /// Key builder for the configured prefix and version.
    pub fn key_builder(&self) -> KeyBuilder {
        KeyBuilder::new(self.key_prefix.clone(), self.version)
    }

    /// Failure handling policy for the resilient cache.
    pub fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy {
            ignore_exceptions: self.ignore_exceptions,
            log_ignored_exceptions: self.log_ignored_exceptions,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            replica_urls: Vec::new(),
            key_prefix: String::new(),
            version: DEFAULT_VERSION,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
            ignore_exceptions: false,
            log_ignored_exceptions: true,
            connect_timeout: None,
            response_timeout: None,
        }
    }
}

/// Parses `1/0`, `true/false`, `yes/no` and `on/off`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
