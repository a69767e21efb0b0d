//! Minute-of-day arithmetic
//!
//! Conversions between `HH:MM` clock strings and minutes since midnight,
//! plus parsing and formatting of human duration text (`1h 30m`).

use chrono::{NaiveTime, Timelike};

use crate::error::{TimelineError, TimelineResult};

/// Number of minutes in the single day the engine operates on
pub const MINUTES_PER_DAY: u32 = 1440;

/// Rendered in place of a zero duration
pub const DURATION_PLACEHOLDER: &str = "-";

/// Parse a 24-hour `HH:MM` clock string into minutes since midnight.
///
/// A single-digit hour (`9:05`) is accepted; minutes must be two digits.
///
/// # Errors
///
/// Returns `TimelineError::InvalidTimeFormat` for anything else, including
/// out-of-range values such as `24:00` or `12:60`.
pub fn parse_time_to_minutes(clock: &str) -> TimelineResult<u32> {
    let trimmed = clock.trim();
    let invalid = || TimelineError::InvalidTimeFormat {
        input: clock.to_string(),
    };

    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;
    let well_formed = (1..=2).contains(&hours.len())
        && minutes.len() == 2
        && hours.bytes().all(|b| b.is_ascii_digit())
        && minutes.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    let time = NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| invalid())?;
    Ok(time.hour() * 60 + time.minute())
}

/// Format minutes since midnight as `HH:MM`.
///
/// The value is not wrapped at midnight: `1440` renders as `24:00`. Callers
/// doing day-shift math must range-check before formatting.
pub fn minutes_to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse duration text into whole minutes.
///
/// Accepts a bare minute count (`90`) or hour/minute components in that
/// order (`2h`, `90m`, `1h 30m`, `1h30m`, `1 hr 5 min`). Returns `None` for
/// anything unparseable so editors can refuse the edit instead of failing.
pub fn parse_duration(text: &str) -> Option<u32> {
    let input = text.trim().to_ascii_lowercase();
    if input.is_empty() {
        return None;
    }
    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse().ok();
    }

    let mut rest = input.as_str();
    let mut total: u32 = 0;
    let mut seen_hours = false;
    let mut seen_minutes = false;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let value: u32 = rest[..digits_end].parse().ok()?;
        rest = rest[digits_end..].trim_start();

        let unit_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = rest[unit_end..].trim_start();

        let factor = match unit {
            "h" | "hr" | "hrs" | "hour" | "hours" if !seen_hours && !seen_minutes => {
                seen_hours = true;
                60
            }
            "m" | "min" | "mins" | "minute" | "minutes" if !seen_minutes => {
                seen_minutes = true;
                1
            }
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(factor)?)?;
    }

    Some(total)
}

/// Format whole minutes as `{h}h {m}m`, omitting a zero component.
///
/// Zero renders as [`DURATION_PLACEHOLDER`].
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, 0) => DURATION_PLACEHOLDER.to_string(),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
