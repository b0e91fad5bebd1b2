//! cachext CLI entry point.

use anyhow::Result;
use cachext::ExtendedCache;
use cachext_cli::cli::keys::ExpireTime;
use cachext_cli::cli::{Cli, Commands, OutputFormat};
use cachext_cli::output::{
    format_output, pretty, CountReport, KeyReport, PatternReport, ScriptStatus,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachext=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.client_config();
    let cache = ExtendedCache::connect(&config).await?;
    tracing::debug!(url = %config.url, prefix = %config.key_prefix, "Connected");

    match cli.command {
        Commands::DeletePattern(args) => {
            let removed = cache.delete_pattern(&args.pattern, &args.options()).await?;
            let report = PatternReport {
                command: "DEL".to_string(),
                pattern: args.pattern,
                removed,
            };
            print_report(&report, cli.format, cli.quiet, pretty::format_pattern);
        }
        Commands::UnlinkPattern(args) => {
            let removed = cache.unlink_pattern(&args.pattern, &args.options()).await?;
            let report = PatternReport {
                command: "UNLINK".to_string(),
                pattern: args.pattern,
                removed,
            };
            print_report(&report, cli.format, cli.quiet, pretty::format_pattern);
        }
        Commands::ExpireAt(args) => {
            let applied = match args.when {
                ExpireTime::Unix(timestamp) => {
                    cache.expire_at(&args.key, timestamp, args.millis).await?
                }
                ExpireTime::At(at) => cache.expire_at_time(&args.key, at, args.millis).await?,
            };
            let report = KeyReport {
                operation: "expire-at".to_string(),
                key: args.key,
                applied,
            };
            print_report(&report, cli.format, cli.quiet, pretty::format_key);
        }
        Commands::Rename(args) => {
            let applied = cache.rename(&args.key, &args.new_key).await?;
            let report = KeyReport {
                operation: "rename".to_string(),
                key: args.key,
                applied,
            };
            print_report(&report, cli.format, cli.quiet, pretty::format_key);
        }
        Commands::Zcount(args) => {
            let range = args.range();
            let count = cache.zcount(&args.key, range).await?;
            let (min, max) = range.to_args()?;
            let report = CountReport {
                key: args.key,
                min,
                max,
                count,
            };
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&report, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_count(&report)),
            }
        }
        Commands::ScriptExists(args) => {
            let shas: Vec<&str> = args.shas.iter().map(String::as_str).collect();
            let loaded = cache.script_exists(&shas).await?;
            let statuses: Vec<ScriptStatus> = args
                .shas
                .iter()
                .zip(loaded)
                .map(|(sha, loaded)| ScriptStatus {
                    sha: sha.clone(),
                    loaded,
                })
                .collect();
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&statuses, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_scripts(&statuses)),
            }
        }
    }

    Ok(())
}

/// Prints the outcome of a mutating command. `--quiet` silences the pretty
/// form only; JSON output is always written.
fn print_report<T: serde::Serialize>(
    report: &T,
    format: OutputFormat,
    quiet: bool,
    pretty: fn(&T) -> String,
) {
    match format {
        OutputFormat::Json => println!("{}", format_output(report, format)),
        OutputFormat::Pretty if !quiet => println!("{}", pretty(report)),
        OutputFormat::Pretty => {}
    }
}
