use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::ConfigError;

/// Produces the human-facing reference for a newly captured location.
pub trait IdStrategy: Send + Sync {
    /// `existing` is the number of locations already in the session and
    /// `timestamp` the capture time in epoch milliseconds.
    fn generate(&self, existing: usize, timestamp: i64) -> String;
}

/// Numbers locations `T1`, `T2`, … in capture order. Unique only while
/// nothing is ever removed from the session.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl IdStrategy for Sequential {
    fn generate(&self, existing: usize, _timestamp: i64) -> String {
        format!("T{}", existing + 1)
    }
}

/// An opaque reference made of the capture time in base 36 and a random
/// suffix, e.g. `kf3x9a2b-1c9e0f7d`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampToken;

const TOKEN_LENGTH: usize = 8;

impl IdStrategy for TimestampToken {
    fn generate(&self, _existing: usize, timestamp: i64) -> String {
        let token = Uuid::new_v4().to_simple().to_string();

        format!("{}-{}", to_base36(timestamp), &token[..TOKEN_LENGTH])
    }
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let negative = value < 0;
    let mut remaining = value.unsigned_abs();
    let mut digits = vec![];

    loop {
        digits.push(DIGITS[(remaining % 36) as usize]);
        remaining /= 36;

        if remaining == 0 {
            break;
        }
    }

    if negative {
        digits.push(b'-');
    }

    digits.iter().rev().map(|&b| b as char).collect()
}

/// The configurable choice of [`IdStrategy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdScheme {
    Sequential,
    Timestamp,
}

impl IdScheme {
    pub fn strategy(self) -> Arc<dyn IdStrategy> {
        match self {
            IdScheme::Sequential => Arc::new(Sequential),
            IdScheme::Timestamp => Arc::new(TimestampToken),
        }
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        IdScheme::Sequential
    }
}

impl FromStr for IdScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdScheme::Sequential),
            "timestamp" => Ok(IdScheme::Timestamp),
            _ => Err(ConfigError::UnknownIdScheme(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{to_base36, IdScheme, IdStrategy, Sequential, TimestampToken};
    use crate::errors::ConfigError;

    #[test]
    fn sequential_counts_from_one() {
        assert_eq!(Sequential.generate(0, 0), "T1");
        assert_eq!(Sequential.generate(41, 0), "T42");
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(-71), "-1z");
    }

    #[test]
    fn timestamp_tokens_start_with_the_encoded_time_and_differ() {
        let ids = (0..100)
            .map(|_| TimestampToken.generate(0, 1_600_000_000_000))
            .collect::<HashSet<_>>();

        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| id.starts_with(&format!("{}-", to_base36(1_600_000_000_000)))));
    }

    #[test]
    fn schemes_parse() {
        assert_eq!("sequential".parse(), Ok(IdScheme::Sequential));
        assert_eq!(" Timestamp ".parse(), Ok(IdScheme::Timestamp));
        assert_eq!(
            "uuid".parse::<IdScheme>(),
            Err(ConfigError::UnknownIdScheme("uuid".to_owned()))
        );
        assert_eq!(IdScheme::default().strategy().generate(2, 0), "T3");
    }
}
