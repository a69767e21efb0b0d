//! Timeline engine for Slate
//!
//! Keeps a shoot day's schedule internally consistent: every lane track is
//! packed gapless (no idle minutes, no overlap) while entries are reordered,
//! moved between tracks, repaired, or slid as a whole day.
//!
//! Every function here is pure. It takes a [`ScheduleSnapshot`] (or its
//! parts) and returns a minimal diff; applying that diff is the caller's job.

pub mod anchor;
pub mod day_shift;
pub mod error;
pub mod models;
pub mod moves;
pub mod packing;
pub mod time;
pub mod track;
pub mod validation;

pub use anchor::{resolve_anchor, track_anchor_start_minutes};
pub use day_shift::{DayStartShift, compute_day_start_shift};
pub use error::{TimelineError, TimelineResult};
pub use models::{
    EntryKind, EntryUpdate, ScheduleEntry, ScheduleSettings, ScheduleSnapshot, StartTimeUpdate,
    TimeIncrement, Track, TrackScope, UpdateBatch,
};
pub use moves::{
    next_append_start, plan_cross_track_move, plan_move_within_track, plan_removal, plan_resize,
    plan_retime, plan_track_reorder,
};
pub use packing::{
    NormalizeOutcome, build_gapless_normalize_start_time_updates, build_gapless_reorder_updates,
    normalize_all_lanes,
};
pub use time::{
    MINUTES_PER_DAY, format_duration, minutes_to_time_string, parse_duration,
    parse_time_to_minutes,
};
pub use track::group_entries_by_track;
pub use validation::{IssueKind, ValidationIssue, ValidationReport, ValidationSeverity, validate_snapshot};
