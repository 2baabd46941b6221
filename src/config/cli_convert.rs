//! CLI value conversion utilities

use anyhow::{Context, Result};
use std::time::Duration;

/// Parse a duration string (e.g., "90s", "5m", "1h", "500ms")
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    let (num_str, unit) = if let Some(num) = s.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = s.strip_suffix('s') {
        (num, "s")
    } else if let Some(num) = s.strip_suffix('m') {
        (num, "m")
    } else if let Some(num) = s.strip_suffix('h') {
        (num, "h")
    } else {
        (s.as_str(), "s")
    };

    let num: u64 = num_str.trim().parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    let secs_per_unit = match unit {
        "ms" => return Ok(Duration::from_millis(num)),
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => anyhow::bail!("Invalid duration unit: {}. Use ms, s, m, or h", unit),
    };

    let secs = num
        .checked_mul(secs_per_unit)
        .with_context(|| format!("Duration too large: {}", s))?;

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("42").unwrap(), Duration::from_secs(42));
        assert_eq!(parse_duration(" 2M ").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("1.5h").is_err());
    }

    #[test]
    fn test_parse_duration_overflow_is_error() {
        assert!(parse_duration("5124095576030432h").is_err());
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("5124095576030431h").unwrap(),
            Duration::from_secs(5124095576030431 * 3600)
        );
    }
}
