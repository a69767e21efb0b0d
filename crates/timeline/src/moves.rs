//! Reorder and move orchestration
//!
//! Translates a UI-level action ("put this entry here", "move it to that
//! track", "make it 45 minutes") into one [`UpdateBatch`] built from the
//! packing engine. The snapshot is never mutated: a tentative copy is built,
//! packed, and diffed against the original.

use tracing::debug;

use crate::anchor::{resolve_anchor, track_anchor_start_minutes};
use crate::error::{TimelineError, TimelineResult};
use crate::models::{ScheduleEntry, ScheduleSnapshot, UpdateBatch, ensure_within_day};
use crate::packing::{build_gapless_normalize_start_time_updates, build_gapless_reorder_updates};
use crate::track::{lane_members, packing_lane};

fn ids<'a>(members: &[&'a ScheduleEntry]) -> Vec<&'a str> {
    members.iter().map(|e| e.id.as_str()).collect()
}

fn require_positive(duration: u32) -> TimelineResult<()> {
    if duration == 0 {
        return Err(TimelineError::InvalidDuration {
            input: duration.to_string(),
        });
    }
    Ok(())
}

/// Repack a track in a caller-supplied order.
///
/// The anchor is the track's current earliest start, or the day start when
/// the track is empty.
///
/// # Errors
///
/// `UnknownTrack` if `track_id` is not in the schedule, plus any packing error.
pub fn plan_track_reorder<S: AsRef<str>>(
    snapshot: &ScheduleSnapshot,
    track_id: &str,
    ordered_entry_ids: &[S],
) -> TimelineResult<UpdateBatch> {
    snapshot.require_track(track_id)?;
    let members = lane_members(&snapshot.entries, &snapshot.tracks, track_id);
    let anchor = resolve_anchor(members.iter().copied(), &snapshot.settings);

    let mut batch = UpdateBatch::new();
    batch.merge_start_times(build_gapless_reorder_updates(
        &snapshot.entries,
        track_id,
        ordered_entry_ids,
        anchor,
    )?);
    Ok(batch)
}

/// Move an entry to position `to_index` within its own lane.
///
/// `to_index` counts positions in the lane's time order after the entry has
/// been lifted out; it is clamped to the end of the lane. Entries that are not
/// lane-packed (multi-lane banners) produce an empty batch.
///
/// # Errors
///
/// `UnknownEntry` or `UnknownTrack` when the entry or its track is missing,
/// plus any packing error.
pub fn plan_move_within_track(
    snapshot: &ScheduleSnapshot,
    entry_id: &str,
    to_index: usize,
) -> TimelineResult<UpdateBatch> {
    let entry = snapshot.require_entry(entry_id)?;
    snapshot.require_track(&entry.track_id)?;
    let Some(lane) = packing_lane(entry, &snapshot.tracks) else {
        debug!(entry_id, "Entry is not lane-packed, nothing to reorder");
        return Ok(UpdateBatch::new());
    };

    let members = lane_members(&snapshot.entries, &snapshot.tracks, lane);
    let anchor = resolve_anchor(members.iter().copied(), &snapshot.settings);

    let mut order: Vec<&str> = ids(&members)
        .into_iter()
        .filter(|id| *id != entry_id)
        .collect();
    order.insert(to_index.min(order.len()), entry.id.as_str());

    let mut batch = UpdateBatch::new();
    batch.merge_start_times(build_gapless_reorder_updates(
        &snapshot.entries,
        lane,
        &order,
        anchor,
    )?);
    Ok(batch)
}

/// Move an entry from its track to `destination_track_id`.
///
/// The entry's position in the destination falls out of a single global time
/// sort. The source lane is packed from its remaining earliest start to close
/// the gap; the destination lane is packed from its pre-move earliest start,
/// or from the moved entry's own start when it was empty. With cascade off
/// only the track changes.
///
/// A banner moved onto a lane track is retargeted to that lane so it packs
/// there instead of in the lane it used to name.
///
/// # Errors
///
/// - `UnknownEntry` if the entry does not exist
/// - `UnknownTrack` if the destination is not part of the schedule
/// - `OutOfDayRange` if either lane would overflow the day
pub fn plan_cross_track_move(
    snapshot: &ScheduleSnapshot,
    entry_id: &str,
    destination_track_id: &str,
) -> TimelineResult<UpdateBatch> {
    let moving = snapshot.require_entry(entry_id)?;
    if moving.track_id == destination_track_id {
        debug!(entry_id, "Entry already on destination track");
        return Ok(UpdateBatch::new());
    }
    let destination = snapshot.require_track(destination_track_id)?;

    let mut batch = UpdateBatch::new();
    batch.set_track(entry_id, destination_track_id);
    // a banner dropped on a lane belongs to that lane from now on
    if destination.is_lane()
        && moving.applies_to_track_ids.is_some()
        && moving.single_target() != Some(destination_track_id)
    {
        batch.set_applies_to(entry_id, vec![destination_track_id.to_string()]);
    }
    if !snapshot.settings.cascade_changes {
        return Ok(batch);
    }

    let tracks = &snapshot.tracks;
    let mut tentative = snapshot.entries.clone();
    batch.apply_to(&mut tentative);

    let source_lane = packing_lane(moving, tracks);
    let destination_lane = tentative
        .iter()
        .find(|e| e.id == entry_id)
        .and_then(|e| packing_lane(e, tracks))
        .map(str::to_string);

    if let Some(source) = source_lane
        && destination_lane.as_deref() != Some(source)
    {
        let remaining = lane_members(&tentative, tracks, source);
        if let Some(anchor) = track_anchor_start_minutes(remaining.iter().copied()) {
            batch.merge_start_times(build_gapless_reorder_updates(
                &snapshot.entries,
                source,
                &ids(&remaining),
                anchor,
            )?);
        }
    }

    if let Some(destination) = destination_lane.as_deref() {
        let before = lane_members(&snapshot.entries, tracks, destination);
        let anchor = track_anchor_start_minutes(before.iter().copied()).unwrap_or(moving.start_time);
        let arrived = lane_members(&tentative, tracks, destination);
        batch.merge_start_times(build_gapless_reorder_updates(
            &snapshot.entries,
            destination,
            &ids(&arrived),
            anchor,
        )?);
    }

    debug!(
        entry_id,
        from = %moving.track_id,
        to = destination_track_id,
        updates = batch.len(),
        "Planned cross-track move"
    );
    Ok(batch)
}

/// Change an entry's duration.
///
/// With cascade on, the entry's lane is repacked in its current order from
/// its current anchor, so everything after the entry follows it. With cascade
/// off only the duration changes, but the entry must still end by 24:00.
pub fn plan_resize(
    snapshot: &ScheduleSnapshot,
    entry_id: &str,
    duration: u32,
) -> TimelineResult<UpdateBatch> {
    require_positive(duration)?;
    let entry = snapshot.require_entry(entry_id)?;
    let mut batch = UpdateBatch::new();
    if entry.duration == duration {
        return Ok(batch);
    }
    batch.set_duration(entry_id, duration);

    let lane = packing_lane(entry, &snapshot.tracks);
    let Some(lane) = lane.filter(|_| snapshot.settings.cascade_changes) else {
        let start = i64::from(entry.start_time);
        ensure_within_day(start, start + i64::from(duration))?;
        return Ok(batch);
    };

    let mut tentative = snapshot.entries.clone();
    if let Some(e) = tentative.iter_mut().find(|e| e.id == entry_id) {
        e.duration = duration;
    }
    let members = lane_members(&tentative, &snapshot.tracks, lane);
    let anchor = resolve_anchor(members.iter().copied(), &snapshot.settings);
    batch.merge_start_times(build_gapless_reorder_updates(
        &tentative,
        lane,
        &ids(&members),
        anchor,
    )?);
    Ok(batch)
}

/// Set an entry's start time.
///
/// With cascade off (or for entries that are not lane-packed) this is an
/// independent move. With cascade on, the lane is re-sorted with the entry at
/// its new start and repacked from the earliest start in the resulting lane.
pub fn plan_retime(
    snapshot: &ScheduleSnapshot,
    entry_id: &str,
    start_time: u32,
) -> TimelineResult<UpdateBatch> {
    let entry = snapshot.require_entry(entry_id)?;
    let start = i64::from(start_time);
    ensure_within_day(start, start + i64::from(entry.duration))?;

    let mut batch = UpdateBatch::new();
    if entry.start_time == start_time {
        return Ok(batch);
    }

    let lane = packing_lane(entry, &snapshot.tracks);
    let Some(lane) = lane.filter(|_| snapshot.settings.cascade_changes) else {
        batch.set_start_time(entry_id, start_time);
        return Ok(batch);
    };

    let mut tentative = snapshot.entries.clone();
    if let Some(e) = tentative.iter_mut().find(|e| e.id == entry_id) {
        e.start_time = start_time;
    }
    let members = lane_members(&tentative, &snapshot.tracks, lane);
    let anchor = resolve_anchor(members.iter().copied(), &snapshot.settings);
    batch.merge_start_times(build_gapless_reorder_updates(
        &snapshot.entries,
        lane,
        &ids(&members),
        anchor,
    )?);
    Ok(batch)
}

/// Updates that close the gap left by removing an entry.
///
/// Runs a normalization pass over the entry's lane without it. Empty when
/// cascade is off or the entry is not lane-packed.
pub fn plan_removal(snapshot: &ScheduleSnapshot, entry_id: &str) -> TimelineResult<UpdateBatch> {
    let entry = snapshot.require_entry(entry_id)?;
    let mut batch = UpdateBatch::new();
    if !snapshot.settings.cascade_changes {
        return Ok(batch);
    }
    let Some(lane) = packing_lane(entry, &snapshot.tracks) else {
        return Ok(batch);
    };

    let remaining: Vec<ScheduleEntry> = snapshot
        .entries
        .iter()
        .filter(|e| e.id != entry_id)
        .cloned()
        .collect();
    batch.merge_start_times(build_gapless_normalize_start_time_updates(
        &remaining,
        &snapshot.tracks,
        lane,
    )?);
    Ok(batch)
}

/// Provisional start for a new entry: right after the last entry of the lane
/// it will be packed in, or the day start when that lane is empty.
///
/// Entries that will not be lane-packed are appended after the last entry
/// owned by the same track. The draft's own `start_time` is ignored.
///
/// # Errors
///
/// - `UnknownTrack` if the draft's track is not in the schedule
/// - `InvalidDuration` for a zero duration
/// - `OutOfDayRange` if the entry would end after 24:00
pub fn next_append_start(snapshot: &ScheduleSnapshot, draft: &ScheduleEntry) -> TimelineResult<u32> {
    snapshot.require_track(&draft.track_id)?;
    require_positive(draft.duration)?;

    let last_end = match packing_lane(draft, &snapshot.tracks) {
        Some(lane) => lane_members(&snapshot.entries, &snapshot.tracks, lane)
            .iter()
            .map(|e| e.end_time())
            .max(),
        None => snapshot
            .entries
            .iter()
            .filter(|e| e.track_id == draft.track_id)
            .map(|e| e.end_time())
            .max(),
    };
    let start = last_end.unwrap_or(snapshot.settings.day_start_time);
    ensure_within_day(i64::from(start), i64::from(start) + i64::from(draft.duration))?;
    Ok(start)
}
