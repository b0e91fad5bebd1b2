//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Result of a pattern bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternReport {
    /// `DEL` or `UNLINK`.
    pub command: String,
    pub pattern: String,
    /// Keys removed, if the store reported a count.
    pub removed: Option<u64>,
}

/// Result of an operation that either applied or did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    pub operation: String,
    pub key: String,
    pub applied: bool,
}

/// Result of a counting operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountReport {
    pub key: String,
    pub min: String,
    pub max: String,
    pub count: u64,
}

/// Whether one script hash is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptStatus {
    pub sha: String,
    pub loaded: bool,
}

/// Format a value for output.
pub fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}
