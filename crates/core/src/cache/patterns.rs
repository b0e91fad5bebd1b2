//! Redis-style glob patterns.
//!
//! Supports the same syntax as `SCAN ... MATCH` and `KEYS`:
//!
//! - `*` matches any sequence of characters (including none)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a]` match one character from (or outside) a class
//! - `\x` matches `x` literally

use super::{CacheError, Result};

const GLOB_SPECIAL: &[char] = &['*', '?', '[', ']', '\\'];

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use cachext_core::cache::pattern_matches;
///
/// assert!(pattern_matches("session:*", "session:42"));
/// assert!(pattern_matches("user:?", "user:7"));
/// assert!(pattern_matches("user:[0-9]", "user:7"));
/// assert!(!pattern_matches("user:[^0-9]", "user:7"));
/// assert!(!pattern_matches("session:*", "other:1"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    match_bytes(pattern.as_bytes(), key.as_bytes())
}

fn match_bytes(pattern: &[u8], key: &[u8]) -> bool {
    let mut p = 0;
    let mut k = 0;

    while p < pattern.len() {
        match pattern[p] {
            b'*' => {
                // Collapse runs of '*'
                while p + 1 < pattern.len() && pattern[p + 1] == b'*' {
                    p += 1;
                }
                if p + 1 == pattern.len() {
                    return true;
                }
                return (k..=key.len()).any(|start| match_bytes(&pattern[p + 1..], &key[start..]));
            }
            b'?' => {
                if k >= key.len() {
                    return false;
                }
                p += 1;
                k += 1;
            }
            b'[' => {
                if k >= key.len() {
                    return false;
                }
                let (matched, next) = match_class(pattern, p + 1, key[k]);
                if !matched {
                    return false;
                }
                p = next;
                k += 1;
            }
            b'\\' if p + 1 < pattern.len() => {
                if k >= key.len() || pattern[p + 1] != key[k] {
                    return false;
                }
                p += 2;
                k += 1;
            }
            literal => {
                if k >= key.len() || literal != key[k] {
                    return false;
                }
                p += 1;
                k += 1;
            }
        }
    }

    k == key.len()
}

/// Matches `byte` against the class starting at `start` (just past the `[`).
/// Returns whether it matched and the index just past the closing `]`.
fn match_class(pattern: &[u8], start: usize, byte: u8) -> (bool, usize) {
    let mut i = start;
    let negate = i < pattern.len() && pattern[i] == b'^';
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < pattern.len() {
        match pattern[i] {
            b']' => {
                i += 1;
                return (matched != negate, i);
            }
            b'\\' if i + 1 < pattern.len() => {
                if pattern[i + 1] == byte {
                    matched = true;
                }
                i += 2;
            }
            low if i + 2 < pattern.len() && pattern[i + 1] == b'-' && pattern[i + 2] != b']' => {
                let high = pattern[i + 2];
                let (low, high) = if low <= high { (low, high) } else { (high, low) };
                if (low..=high).contains(&byte) {
                    matched = true;
                }
                i += 3;
            }
            other => {
                if other == byte {
                    matched = true;
                }
                i += 1;
            }
        }
    }

    (matched != negate, i)
}

/// Escapes glob metacharacters so the text only ever matches itself.
///
/// # Examples
///
/// ```
/// use cachext_core::cache::glob_escape;
///
/// assert_eq!(glob_escape("a*b"), "a\\*b");
/// assert_eq!(glob_escape("plain"), "plain");
/// ```
pub fn glob_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if GLOB_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Rejects patterns the store would interpret differently from what the caller
/// most likely meant: empty patterns, unclosed classes and dangling escapes.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    let invalid = |reason: &str| CacheError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    }

    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if i + 1 >= bytes.len() {
                    return Err(invalid("dangling escape at end of pattern"));
                }
                i += 2;
            }
            b'[' => {
                i += 1;
                let mut closed = false;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b']' => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                if !closed {
                    return Err(invalid("unclosed character class"));
                }
            }
            _ => i += 1,
        }
    }

    Ok(())
}
