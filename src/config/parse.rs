//! Typed parsing helpers shared by the sub-configs.
//!
//! Every helper reads through a lookup function so the sub-configs can be
//! built from the process environment or from a fixed map in tests.

use anyhow::{Context, Result, bail};
use std::str::FromStr;
use std::time::Duration;

pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Raw value of `key`, with surrounding whitespace removed and blanks treated
/// as unset.
pub fn raw(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_or<T>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw(lookup, key) {
        Some(value) => value
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

pub fn string_or(lookup: Lookup<'_>, key: &str, default: &str) -> String {
    raw(lookup, key).unwrap_or_else(|| default.to_string())
}

pub fn parse_bool(lookup: Lookup<'_>, key: &str, default: bool) -> Result<bool> {
    match raw(lookup, key) {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => bail!("Failed to parse {}: '{}' is not a boolean", key, other),
        },
        None => Ok(default),
    }
}

/// Seconds as a float, e.g. `5` or `0.25`. Negative values are rejected.
pub fn parse_seconds(lookup: Lookup<'_>, key: &str, default: Duration) -> Result<Duration> {
    match raw(lookup, key) {
        Some(value) => {
            let seconds = value
                .parse::<f64>()
                .context(format!("Failed to parse {}", key))?;
            Duration::try_from_secs_f64(seconds).context(format!(
                "{} must be a non-negative number of seconds, got {}",
                key, value
            ))
        }
        None => Ok(default),
    }
}

/// Integer in decimal or `0x` hexadecimal notation.
pub fn parse_u8_auto_radix(lookup: Lookup<'_>, key: &str, default: u8) -> Result<u8> {
    match raw(lookup, key) {
        Some(value) => {
            let parsed = match value
                .strip_prefix("0x")
                .or_else(|| value.strip_prefix("0X"))
            {
                Some(hex) => u8::from_str_radix(hex, 16),
                None => value.parse::<u8>(),
            };
            parsed.context(format!("Failed to parse {}", key))
        }
        None => Ok(default),
    }
}
