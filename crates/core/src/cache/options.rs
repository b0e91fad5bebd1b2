//! Typed options for list, sorted-set and expiry commands.
//!
//! Each option type validates itself and renders the exact arguments the store
//! expects, so the client only has to append them to a command.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{CacheError, Result};

/// One end of a sorted-set score range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScoreBound {
    /// No bound on this end (`-inf` or `+inf`).
    #[default]
    Unbounded,
    /// Scores equal to the bound are included.
    Inclusive(f64),
    /// Scores equal to the bound are excluded (`(` prefix).
    Exclusive(f64),
}

impl ScoreBound {
    fn to_arg(self, infinity: &str) -> Result<String> {
        Ok(match self {
            ScoreBound::Unbounded => infinity.to_string(),
            ScoreBound::Inclusive(score) => format_score(validate_score(score)?),
            ScoreBound::Exclusive(score) => format!("({}", format_score(validate_score(score)?)),
        })
    }
}

/// Rejects NaN, which the store answers with a generic float error.
pub fn validate_score(score: f64) -> Result<f64> {
    if score.is_nan() {
        return Err(CacheError::InvalidArgument(
            "score must be a number, got NaN".to_string(),
        ));
    }
    Ok(score)
}

impl From<f64> for ScoreBound {
    fn from(score: f64) -> Self {
        ScoreBound::Inclusive(score)
    }
}

impl From<Option<f64>> for ScoreBound {
    fn from(score: Option<f64>) -> Self {
        score.map_or(ScoreBound::Unbounded, ScoreBound::Inclusive)
    }
}

fn format_score(score: f64) -> String {
    if score == f64::INFINITY {
        "+inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        score.to_string()
    }
}

/// A score range for ZCOUNT, ZRANGEBYSCORE and ZREMRANGEBYSCORE.
///
/// The default range is unbounded on both ends. For
/// [`zrem_range_by_score`](https://redis.io/commands/zremrangebyscore) that
/// means every member is removed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreRange {
    pub min: ScoreBound,
    pub max: ScoreBound,
}

impl ScoreRange {
    /// Every score, `-inf` to `+inf`.
    pub fn all() -> Self {
        Self::default()
    }

    /// Inclusive on both ends.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: ScoreBound::Inclusive(min),
            max: ScoreBound::Inclusive(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: ScoreBound::Inclusive(min),
            max: ScoreBound::Unbounded,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: ScoreBound::Unbounded,
            max: ScoreBound::Inclusive(max),
        }
    }

    /// Builds a range from optional inclusive bounds.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min == ScoreBound::Unbounded && self.max == ScoreBound::Unbounded
    }

    /// Renders the `min` and `max` arguments.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidArgument` if either bound is NaN.
    pub fn to_args(&self) -> Result<(String, String)> {
        Ok((self.min.to_arg("-inf")?, self.max.to_arg("+inf")?))
    }
}

/// Conditions for ZADD. The two flags are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZAddFlags {
    /// Only add new members, never update existing scores (`NX`).
    pub not_existing: bool,
    /// Only update existing members, never add new ones (`XX`).
    pub only_existing: bool,
}

impl ZAddFlags {
    pub fn not_existing() -> Self {
        Self {
            not_existing: true,
            only_existing: false,
        }
    }

    pub fn only_existing() -> Self {
        Self {
            not_existing: false,
            only_existing: true,
        }
    }

    /// Validates the flags and returns the condition argument, if any.
    pub fn to_arg(self) -> Result<Option<&'static str>> {
        match (self.not_existing, self.only_existing) {
            (true, true) => Err(CacheError::InvalidArgument(
                "ZADD flags not_existing and only_existing are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(Some("NX")),
            (false, true) => Ok(Some("XX")),
            (false, false) => Ok(None),
        }
    }
}

/// Where LINSERT places the new element relative to the reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    Before,
    After,
}

impl ListPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ListPosition::Before => "BEFORE",
            ListPosition::After => "AFTER",
        }
    }
}

/// Expiry for SET, either absolute (a Unix timestamp) or relative.
///
/// When both are supplied the absolute timestamp wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetExpiry {
    /// Unix timestamp, in seconds or milliseconds depending on `millis`.
    pub at: Option<i64>,
    /// Relative time to live.
    pub after: Option<Duration>,
    /// Use millisecond resolution (`PXAT`/`PX`) instead of seconds.
    pub millis: bool,
}

impl SetExpiry {
    pub fn at(timestamp: i64) -> Self {
        Self {
            at: Some(timestamp),
            ..Self::default()
        }
    }

    pub fn after(ttl: Duration) -> Self {
        Self {
            after: Some(ttl),
            ..Self::default()
        }
    }

    pub fn in_millis(mut self) -> Self {
        self.millis = true;
        self
    }

    /// Picks the SET expiry argument.
    ///
    /// Fails when the relative duration rounds to zero in the chosen unit,
    /// which the store would reject as an invalid expire time.
    pub fn resolve(&self) -> Result<Option<ExpiryArg>> {
        if let Some(timestamp) = self.at {
            return Ok(Some(if self.millis {
                ExpiryArg::PxAt(timestamp)
            } else {
                ExpiryArg::ExAt(timestamp)
            }));
        }

        let Some(ttl) = self.after else {
            return Ok(None);
        };

        let amount = if self.millis {
            u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
        } else {
            ttl.as_secs()
        };
        if amount == 0 {
            return Err(CacheError::InvalidArgument(format!(
                "expiry of {:?} rounds to zero {}",
                ttl,
                if self.millis { "milliseconds" } else { "seconds" }
            )));
        }

        Ok(Some(if self.millis {
            ExpiryArg::Px(amount)
        } else {
            ExpiryArg::Ex(amount)
        }))
    }
}

/// A resolved SET expiry argument pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryArg {
    Ex(u64),
    Px(u64),
    ExAt(i64),
    PxAt(i64),
}

impl ExpiryArg {
    pub fn option(&self) -> &'static str {
        match self {
            ExpiryArg::Ex(_) => "EX",
            ExpiryArg::Px(_) => "PX",
            ExpiryArg::ExAt(_) => "EXAT",
            ExpiryArg::PxAt(_) => "PXAT",
        }
    }

    pub fn value(&self) -> i64 {
        match *self {
            ExpiryArg::Ex(v) | ExpiryArg::Px(v) => i64::try_from(v).unwrap_or(i64::MAX),
            ExpiryArg::ExAt(v) | ExpiryArg::PxAt(v) => v,
        }
    }
}

/// Converts a point in time to the Unix timestamp EXPIREAT/PEXPIREAT expect.
pub fn unix_timestamp(at: DateTime<Utc>, millis: bool) -> i64 {
    if millis {
        at.timestamp_millis()
    } else {
        at.timestamp()
    }
}
