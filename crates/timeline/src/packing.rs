//! Gapless packing engine
//!
//! Both entry points are pure functions of the snapshot. They return a minimal
//! diff: only entries whose start time actually changes are listed, so the
//! store touches the fewest records.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::error::{TimelineError, TimelineResult};
use crate::models::{ScheduleEntry, ScheduleSnapshot, StartTimeUpdate, Track, UpdateBatch, ensure_within_day};
use crate::track::{lane_ids, lane_members};

/// Pack `ordered_entry_ids` back to back starting at `anchor_start_minutes`.
///
/// Entries of the track that are missing from `ordered_entry_ids` are left
/// where they are; callers include every entry they want packed. A repeated
/// id is packed once, at its first position.
///
/// # Errors
///
/// - `UnknownEntry` if an id is not in `entries`
/// - `OutOfDayRange` if the packed block would end after 24:00
pub fn build_gapless_reorder_updates<S: AsRef<str>>(
    entries: &[ScheduleEntry],
    track_id: &str,
    ordered_entry_ids: &[S],
    anchor_start_minutes: u32,
) -> TimelineResult<Vec<StartTimeUpdate>> {
    let by_id: HashMap<&str, &ScheduleEntry> =
        entries.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut seen = HashSet::new();
    let mut sequence: Vec<&ScheduleEntry> = Vec::with_capacity(ordered_entry_ids.len());
    for id in ordered_entry_ids {
        let id = id.as_ref();
        let entry = by_id
            .get(id)
            .copied()
            .ok_or_else(|| TimelineError::UnknownEntry {
                entry_id: id.to_string(),
            })?;
        if seen.insert(id) {
            sequence.push(entry);
        } else {
            warn!(track_id, entry_id = id, "Duplicate entry in packing order ignored");
        }
    }

    let total: i64 = sequence.iter().map(|e| i64::from(e.duration)).sum();
    let anchor = i64::from(anchor_start_minutes);
    ensure_within_day(anchor, anchor + total)?;

    let mut updates = Vec::new();
    let mut cursor = anchor_start_minutes;
    for entry in sequence {
        if entry.start_time != cursor {
            trace!(entry_id = %entry.id, from = entry.start_time, to = cursor, "Repositioning entry");
            updates.push(StartTimeUpdate::new(entry.id.clone(), cursor));
        }
        cursor += entry.duration;
    }

    debug!(
        track_id,
        anchor = anchor_start_minutes,
        updates = updates.len(),
        "Packed track"
    );
    Ok(updates)
}

/// One-time repair of a lane: sort by current start and pack from the
/// earliest start already present.
///
/// Preserves where the block of work sits in the day and only removes
/// internal gaps and overlaps. Idempotent: a packed lane yields no updates.
pub fn build_gapless_normalize_start_time_updates(
    entries: &[ScheduleEntry],
    tracks: &[Track],
    track_id: &str,
) -> TimelineResult<Vec<StartTimeUpdate>> {
    let members = lane_members(entries, tracks, track_id);
    let Some(anchor) = members.first().map(|e| e.start_time) else {
        return Ok(Vec::new());
    };
    let order: Vec<&str> = members.iter().map(|e| e.id.as_str()).collect();
    build_gapless_reorder_updates(entries, track_id, &order, anchor)
}

/// Result of normalizing every lane of a schedule
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    /// Merged start-time updates for all lanes that could be packed
    pub batch: UpdateBatch,
    /// Lanes left untouched, with the reason
    pub skipped: Vec<(String, TimelineError)>,
}

/// Normalize every lane track of the snapshot.
///
/// Safe to run on every load. A lane that cannot be packed (its entries
/// would overflow the day) is reported in `skipped` and left as is; the other
/// lanes are still repaired.
pub fn normalize_all_lanes(snapshot: &ScheduleSnapshot) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    for lane_id in lane_ids(&snapshot.tracks) {
        match build_gapless_normalize_start_time_updates(
            &snapshot.entries,
            &snapshot.tracks,
            lane_id,
        ) {
            Ok(updates) => outcome.batch.merge_start_times(updates),
            Err(err) => {
                warn!(track_id = lane_id, error = %err, "Lane could not be normalized");
                outcome.skipped.push((lane_id.to_string(), err));
            }
        }
    }
    outcome
}
