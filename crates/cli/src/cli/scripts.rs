//! Script CLI commands.

use clap::Parser;

/// Arguments for `script-exists`.
#[derive(Debug, Parser)]
pub struct ScriptExistsArgs {
    /// SHA1 hashes to look up.
    #[arg(required = true)]
    pub shas: Vec<String>,
}
