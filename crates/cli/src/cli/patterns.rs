//! Pattern bulk-operation arguments.

use cachext::PatternOptions;
use clap::Parser;

/// Arguments shared by `delete-pattern` and `unlink-pattern`.
#[derive(Debug, Parser)]
pub struct PatternArgs {
    /// Glob pattern, relative to the key prefix and version (e.g. `session:*`).
    pub pattern: String,
    /// Match this key version instead of the default.
    #[arg(long = "pattern-version")]
    pub version: Option<i64>,
    /// Match this prefix instead of the configured one.
    #[arg(long)]
    pub prefix: Option<String>,
    /// SCAN batch size for this run.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl PatternArgs {
    pub fn options(&self) -> PatternOptions {
        PatternOptions {
            version: self.version,
            prefix: self.prefix.clone(),
            batch_size: self.batch_size,
        }
    }
}
