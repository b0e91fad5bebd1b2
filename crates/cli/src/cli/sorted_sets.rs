//! Sorted-set CLI commands.

use cachext::{ScoreBound, ScoreRange};
use clap::Parser;

/// Parses a score bound in Redis notation: `-inf`, `+inf`, `5` or `(5`.
pub fn parse_score_bound(value: &str) -> Result<ScoreBound, String> {
    let (exclusive, number) = match value.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let score = match number {
        "-inf" => f64::NEG_INFINITY,
        "+inf" | "inf" => f64::INFINITY,
        other => other
            .parse::<f64>()
            .map_err(|_| format!("invalid score bound {value:?}"))?,
    };

    if score.is_nan() {
        return Err(format!("invalid score bound {value:?}"));
    }
    if score.is_infinite() {
        Ok(ScoreBound::Unbounded)
    } else if exclusive {
        Ok(ScoreBound::Exclusive(score))
    } else {
        Ok(ScoreBound::Inclusive(score))
    }
}

/// Arguments for `zcount`.
#[derive(Debug, Parser)]
pub struct ZcountArgs {
    /// Sorted-set key.
    pub key: String,
    /// Lower bound (`-inf`, `5` or `(5`).
    #[arg(long, default_value = "-inf", value_parser = parse_score_bound, allow_hyphen_values = true)]
    pub min: ScoreBound,
    /// Upper bound (`+inf`, `5` or `(5`).
    #[arg(long, default_value = "+inf", value_parser = parse_score_bound, allow_hyphen_values = true)]
    pub max: ScoreBound,
}

impl ZcountArgs {
    pub fn range(&self) -> ScoreRange {
        ScoreRange {
            min: self.min,
            max: self.max,
        }
    }
}
