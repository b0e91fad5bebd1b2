//! CLI command definitions.

pub mod keys;
pub mod patterns;
pub mod scripts;
pub mod sorted_sets;

use std::time::Duration;

use cachext::ClientConfig;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Operator CLI for cachext-managed Redis keyspaces.
#[derive(Debug, Parser)]
#[command(name = "cachext")]
#[command(about = "Operator CLI for cachext-managed Redis keyspaces", long_about = None)]
pub struct Cli {
    /// Redis connection URL.
    #[arg(long, env = "CACHEXT_URL", default_value = "redis://localhost:6379")]
    pub url: String,

    /// Read replica URLs, comma-separated. Read-only commands go to a random replica.
    #[arg(long, env = "CACHEXT_REPLICA_URLS", value_delimiter = ',')]
    pub replica_urls: Vec<String>,

    /// Key prefix of the keyspace to operate on.
    #[arg(long, env = "CACHEXT_KEY_PREFIX", default_value = "")]
    pub key_prefix: String,

    /// Default key version.
    #[arg(long = "key-version", env = "CACHEXT_VERSION", default_value_t = 1)]
    pub version: i64,

    /// SCAN batch size for pattern operations.
    #[arg(long, env = "CACHEXT_SCAN_BATCH_SIZE", default_value_t = 50_000)]
    pub scan_batch_size: usize,

    /// Report store failures as empty results instead of errors.
    #[arg(long, env = "CACHEXT_IGNORE_EXCEPTIONS", value_parser = BoolishValueParser::new())]
    pub ignore_exceptions: bool,

    /// Log failures swallowed by `--ignore-exceptions`.
    #[arg(
        long,
        env = "CACHEXT_LOG_IGNORED_EXCEPTIONS",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub log_ignored_exceptions: bool,

    /// Connection timeout in milliseconds, retries included.
    #[arg(long, env = "CACHEXT_CONNECT_TIMEOUT_MS", default_value_t = 5_000)]
    pub connect_timeout_ms: u64,

    /// Response timeout in milliseconds.
    #[arg(long, env = "CACHEXT_RESPONSE_TIMEOUT_MS")]
    pub response_timeout_ms: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Client configuration built from the connection arguments.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            replica_urls: self
                .replica_urls
                .iter()
                .map(|url| url.trim())
                .filter(|url| !url.is_empty())
                .map(String::from)
                .collect(),
            key_prefix: self.key_prefix.clone(),
            version: self.version,
            scan_batch_size: self.scan_batch_size,
            ignore_exceptions: self.ignore_exceptions,
            log_ignored_exceptions: self.log_ignored_exceptions,
            connect_timeout: Some(Duration::from_millis(self.connect_timeout_ms)),
            response_timeout: self.response_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Delete every key matching a pattern (DEL).
    DeletePattern(patterns::PatternArgs),
    /// Unlink every key matching a pattern (UNLINK, reclaimed in the background).
    UnlinkPattern(patterns::PatternArgs),
    /// Expire a key at an absolute time.
    ExpireAt(keys::ExpireAtArgs),
    /// Rename a key.
    Rename(keys::RenameArgs),
    /// Count sorted-set members within a score range.
    Zcount(sorted_sets::ZcountArgs),
    /// Check which script hashes the store knows.
    ScriptExists(scripts::ScriptExistsArgs),
}
