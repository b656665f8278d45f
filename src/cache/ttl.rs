//! TTL Module
//!
//! Validated time-to-live shared by every entry of a cache instance.
//!
//! Accepted forms:
//! - plain seconds: `"3600"`
//! - composite units summed together: `"1h,30m,15s"`, `"45m"`, `"2h, 10s"`

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::MAX_TTL_SECONDS;
use crate::error::ConfigError;

// == Ttl ==
/// A time-to-live in seconds, guaranteed to lie in `0..=MAX_TTL_SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ttl(u64);

impl Ttl {
    /// Validates a TTL given in seconds.
    pub fn from_secs(seconds: u64) -> Result<Self, ConfigError> {
        if seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::TtlOutOfRange(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }
}

impl Default for Ttl {
    /// One day.
    fn default() -> Self {
        Self(MAX_TTL_SECONDS)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl FromStr for Ttl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ConfigError::InvalidTtl(s.to_string()));
        }

        if input.bytes().all(|b| b.is_ascii_digit()) {
            return Self::from_secs(parse_digits(input));
        }

        let mut total: u64 = 0;
        for part in input.split(',') {
            let seconds =
                parse_unit(part.trim()).ok_or_else(|| ConfigError::InvalidTtl(s.to_string()))?;
            // Saturate so absurd inputs still report as out of range
            total = total.saturating_add(seconds);
        }
        Self::from_secs(total)
    }
}

/// Parses one `<N><unit>` component into seconds.
fn parse_unit(part: &str) -> Option<u64> {
    let unit = part.chars().last()?;
    let multiplier = match unit.to_ascii_lowercase() {
        'h' => 3600,
        'm' => 60,
        's' => 1,
        _ => return None,
    };

    let digits = part[..part.len() - unit.len_utf8()].trim_end();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(parse_digits(digits).saturating_mul(multiplier))
}

/// Parses a non-empty run of ASCII digits, saturating at `u64::MAX` so an
/// oversized number reports as out of range rather than malformed.
fn parse_digits(digits: &str) -> u64 {
    digits.parse::<u64>().unwrap_or(u64::MAX)
}
