//! Whole-day start shift
//!
//! Slides every entry of the schedule by the same delta so the earliest
//! lane-packed entry lands on the requested day start. Relative offsets
//! between all entries are preserved; the shift either applies completely or
//! not at all.

use tracing::{debug, info};

use crate::error::{TimelineError, TimelineResult};
use crate::models::{ScheduleEntry, ScheduleSettings, Track, UpdateBatch, ensure_within_day};
use crate::time::MINUTES_PER_DAY;
use crate::track::packing_lane;

/// Outcome of a successful day-start shift
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStartShift {
    /// Start-time updates, one per entry that moves
    pub updates: UpdateBatch,
    /// Settings with the new `day_start_time`
    pub next_settings: ScheduleSettings,
    /// Minutes every entry moved by (negative means earlier)
    pub delta: i64,
}

/// Compute the shift that moves the earliest lane entry to `next_day_start`.
///
/// The reference start is the minimum over entries packed in a lane track;
/// a schedule holding only banners falls back to its earliest entry. Every
/// entry, banners included, moves by the same delta and must stay inside the
/// day. With no entries only the setting changes.
///
/// # Errors
///
/// `OutOfDayRange` when the requested start is not a minute of the day, or
/// when any shifted entry would start before 00:00 or end after 24:00. No
/// updates are produced in that case.
pub fn compute_day_start_shift(
    entries: &[ScheduleEntry],
    tracks: &[Track],
    current_settings: &ScheduleSettings,
    next_day_start: u32,
) -> TimelineResult<DayStartShift> {
    let target = i64::from(next_day_start);
    if next_day_start >= MINUTES_PER_DAY {
        return Err(TimelineError::OutOfDayRange {
            earliest_start: target,
            latest_end: target,
        });
    }

    let next_settings = ScheduleSettings {
        day_start_time: next_day_start,
        ..*current_settings
    };

    let span_start = entries.iter().map(|e| i64::from(e.start_time)).min();
    let latest_end = entries.iter().map(|e| i64::from(e.end_time())).max();
    let (Some(span_start), Some(latest_end)) = (span_start, latest_end) else {
        debug!(next_day_start, "No entries, only the day start changes");
        return Ok(DayStartShift {
            updates: UpdateBatch::new(),
            next_settings,
            delta: 0,
        });
    };

    let earliest_start = entries
        .iter()
        .filter(|e| packing_lane(e, tracks).is_some())
        .map(|e| i64::from(e.start_time))
        .min()
        .unwrap_or(span_start);

    let delta = target - earliest_start;
    ensure_within_day(span_start + delta, latest_end + delta)?;

    let mut updates = UpdateBatch::new();
    if delta != 0 {
        for entry in entries {
            let shifted = i64::from(entry.start_time) + delta;
            // range already checked for the whole span
            let shifted = u32::try_from(shifted).map_err(|_| TimelineError::OutOfDayRange {
                earliest_start: span_start + delta,
                latest_end: latest_end + delta,
            })?;
            updates.set_start_time(&entry.id, shifted);
        }
    }

    info!(
        from = current_settings.day_start_time,
        to = next_day_start,
        delta,
        updates = updates.len(),
        "Computed day start shift"
    );
    Ok(DayStartShift {
        updates,
        next_settings,
        delta,
    })
}
