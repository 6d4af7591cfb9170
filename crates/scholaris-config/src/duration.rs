//! Parsing of lifetime strings such as `24h`, `7d`, `15m`, `30s` or `3600`.
//!
//! A bare number is read as seconds.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid number in duration: {0}")]
    Number(String),
    #[error("unknown duration unit: {0}")]
    Unit(String),
    #[error("duration too large: {0}")]
    Overflow(String),
}

pub fn parse_duration(raw: &str) -> Result<Duration, DurationParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);

    let value: u64 = number
        .parse()
        .map_err(|_| DurationParseError::Number(raw.to_string()))?;

    let multiplier: u64 = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        other => return Err(DurationParseError::Unit(other.to_string())),
    };

    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| DurationParseError::Overflow(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(604_800));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(1_209_600));
    }

    #[test]
    fn test_bare_seconds() {
        assert_eq!(parse_duration("3600").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration(" 60 ").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
        assert!(matches!(parse_duration("h"), Err(DurationParseError::Number(_))));
        assert!(matches!(parse_duration("5y"), Err(DurationParseError::Unit(_))));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            parse_duration("99999999999999999w"),
            Err(DurationParseError::Overflow(_))
        ));
        assert!(matches!(
            parse_duration("18446744073709551615d"),
            Err(DurationParseError::Overflow(_))
        ));
        assert_eq!(
            parse_duration("18446744073709551615").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }
}
