use thiserror::Error;

/// Errors produced by the timeline engine
///
/// Every variant blocks exactly one requested change; the snapshot the
/// caller passed in is never modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// A clock string was not in `HH:MM` 24-hour form
    #[error("Invalid time '{input}': expected HH:MM (00:00-23:59)")]
    InvalidTimeFormat { input: String },

    /// A duration could not be used (unparseable text or not positive)
    #[error("Invalid duration '{input}': expected a positive duration such as 45m or 1h 30m")]
    InvalidDuration { input: String },

    /// A track id that is not part of the schedule
    #[error("Track '{track_id}' does not exist in this schedule")]
    UnknownTrack { track_id: String },

    /// An entry id that is not part of the snapshot
    #[error("Entry '{entry_id}' not found")]
    UnknownEntry { entry_id: String },

    /// The change would place an entry outside of [0, 1440]
    #[error(
        "Change would move the schedule outside the day: earliest start {earliest_start}, latest end {latest_end} (allowed 0-1440)"
    )]
    OutOfDayRange { earliest_start: i64, latest_end: i64 },
}

/// Result type alias for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;
