use std::time::Duration;

use crate::error::DurationError;

/// Parse a `MM:SS` duration as exported by djay.
///
/// Seconds are not range-checked: `"1:75"` is 135 seconds.
/// Signs are rejected so a duration can never be negative.
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let mut parts = s.split(':');
    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m, s),
        _ => return Err(DurationError::Separator(s.to_string())),
    };

    let minutes = parse_unsigned(minutes).ok_or_else(|| DurationError::Minutes(s.to_string()))?;
    let seconds = parse_unsigned(seconds).ok_or_else(|| DurationError::Seconds(s.to_string()))?;

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .map(Duration::from_secs)
        .ok_or_else(|| DurationError::Minutes(s.to_string()))
}

fn parse_unsigned(s: &str) -> Option<u64> {
    if s.starts_with('-') {
        return None;
    }
    s.parse().ok()
}

/// Format a duration as `M:SS` for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
