//! Anchor resolution
//!
//! The anchor is the minute a lane's packing sequence starts from. Packing is
//! relative to whatever is already first, so repacking after an insert or a
//! delete never slides the whole lane unless the day start itself changes.

use crate::models::{ScheduleEntry, ScheduleSettings};

/// Earliest start among a lane's entries, or `None` for an empty lane.
pub fn track_anchor_start_minutes<'a, I>(entries_in_track: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    entries_in_track.into_iter().map(|e| e.start_time).min()
}

/// Anchor for a lane, falling back to the schedule's day start when empty.
pub fn resolve_anchor<'a, I>(entries_in_track: I, settings: &ScheduleSettings) -> u32
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    track_anchor_start_minutes(entries_in_track).unwrap_or(settings.day_start_time)
}
