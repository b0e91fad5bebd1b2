use std::fmt;

use super::patterns::{glob_escape, validate_pattern};
use super::Result;

/// Separator between the prefix, version and logical key.
pub const KEY_SEPARATOR: char = ':';

/// Version used when neither the caller nor the configuration picks one.
pub const DEFAULT_VERSION: i64 = 1;

/// A key (or glob pattern) that already carries its prefix and version.
///
/// Only [`KeyBuilder`] creates these, so every command the client issues is
/// guaranteed to target the namespaced keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedKey(String);

impl NamespacedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NamespacedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds namespaced keys of the form `prefix:version:key`.
///
/// # Examples
///
/// ```
/// use cachext_core::cache::KeyBuilder;
///
/// let keys = KeyBuilder::new("app", 1);
/// assert_eq!(keys.make_key("user:42", None).as_str(), "app:1:user:42");
/// assert_eq!(keys.make_key("user:42", Some(2)).as_str(), "app:2:user:42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
    version: i64,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>, version: i64) -> Self {
        Self {
            prefix: prefix.into(),
            version,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Default version applied when a call does not specify one.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Namespaces a logical key with the configured prefix and the given (or
    /// default) version.
    pub fn make_key(&self, key: &str, version: Option<i64>) -> NamespacedKey {
        let version = version.unwrap_or(self.version);
        NamespacedKey(format!(
            "{}{sep}{}{sep}{}",
            self.prefix,
            version,
            key,
            sep = KEY_SEPARATOR
        ))
    }

    /// Namespaces a glob pattern.
    ///
    /// The prefix (configured or overridden) is glob-escaped so that only the
    /// caller's pattern contributes wildcards. Fails on a malformed pattern.
    pub fn make_pattern(
        &self,
        pattern: &str,
        version: Option<i64>,
        prefix: Option<&str>,
    ) -> Result<NamespacedKey> {
        validate_pattern(pattern)?;
        let prefix = prefix.unwrap_or(&self.prefix);
        let version = version.unwrap_or(self.version);
        Ok(NamespacedKey(format!(
            "{}{sep}{}{sep}{}",
            glob_escape(prefix),
            version,
            pattern,
            sep = KEY_SEPARATOR
        )))
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new("", DEFAULT_VERSION)
    }
}
