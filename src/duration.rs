//! Duration strings in the `1h30m`, `5m0s`, `250ms` style.
//!
//! Endpoint frequencies travel as strings through the config API and the CSV
//! store; this module converts them to and from [`std::time::Duration`].
//! `parse_duration(format_duration(d)) == d` holds for any duration with
//! millisecond resolution.

use std::time::Duration;

use thiserror::Error;

/// Duration string error types.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration string is empty")]
    Empty,
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),
    #[error("invalid number \"{0}\" in duration")]
    InvalidNumber(String),
    #[error("unknown unit \"{0}\" in duration")]
    UnknownUnit(String),
}

/// Parse a duration string such as `"5m0s"`, `"90s"`, `"1h30m"` or `"250ms"`.
///
/// Accepts a sequence of `<number><unit>` segments where the unit is one of
/// `h`, `m`, `s`, `ms` and the number may carry a decimal fraction.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(DurationError::InvalidNumber(rest.to_string()));
        }
        if digits == rest.len() {
            return Err(DurationError::MissingUnit(s.to_string()));
        }
        let value: f64 = rest[..digits]
            .parse()
            .map_err(|_| DurationError::InvalidNumber(rest[..digits].to_string()))?;

        let unit_len = rest[digits..]
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len() - digits);
        let unit = &rest[digits..digits + unit_len];
        let seconds = match unit {
            "h" => value * 3600.0,
            "m" => value * 60.0,
            "s" => value,
            "ms" => value / 1000.0,
            other => return Err(DurationError::UnknownUnit(other.to_string())),
        };
        total += Duration::from_secs_f64(seconds);
        rest = &rest[digits + unit_len..];
    }

    Ok(total)
}

/// Format a duration so that [`parse_duration`] reads it back unchanged.
///
/// Durations of a minute or more spell out every lower unit (`5m0s`, not
/// `5m`), matching the form the config API serves.
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }

    let total_ms = d.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if hours == 0 && minutes == 0 && seconds == 0 {
        return format!("{millis}ms");
    }

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if millis > 0 {
        let mut frac = format!("{millis:03}");
        while frac.ends_with('0') {
            frac.pop();
        }
        out.push_str(&format!("{seconds}.{frac}s"));
    } else {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(parse_duration("5m0s"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration("90s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("   "), Err(DurationError::Empty));
        assert_eq!(
            parse_duration("5"),
            Err(DurationError::MissingUnit("5".to_string()))
        );
        assert_eq!(
            parse_duration("5x"),
            Err(DurationError::UnknownUnit("x".to_string()))
        );
        assert_eq!(
            parse_duration("m5"),
            Err(DurationError::InvalidNumber("m5".to_string()))
        );
    }

    #[test]
    fn formats_with_lower_units_spelled_out() {
        assert_eq!(format_duration(Duration::from_secs(300)), "5m0s");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h30m0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(10)), "10s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn round_trips_through_format() {
        for secs in [1u64, 59, 60, 61, 299, 300, 3600, 3661, 86400] {
            let d = Duration::from_secs(secs);
            assert_eq!(parse_duration(&format_duration(d)), Ok(d));
        }
        for ms in [1u64, 250, 999, 1001, 61_500] {
            let d = Duration::from_millis(ms);
            assert_eq!(parse_duration(&format_duration(d)), Ok(d));
        }
    }
}
