//! Track membership and time ordering
//!
//! Grouping is recomputed from the snapshot on every call; nothing is cached
//! between engine invocations.

use std::collections::BTreeMap;

use crate::models::{ScheduleEntry, Track};

/// Lane an entry is packed in, if any.
///
/// A banner naming exactly one lane packs in that lane. Other banners, and
/// entries owned by a shared (or unknown) track, are never lane-packed.
pub fn packing_lane<'a>(entry: &'a ScheduleEntry, tracks: &[Track]) -> Option<&'a str> {
    let candidate = match &entry.applies_to_track_ids {
        Some(_) => entry.single_target()?,
        None => entry.track_id.as_str(),
    };
    tracks
        .iter()
        .any(|t| t.id == candidate && t.is_lane())
        .then_some(candidate)
}

/// Stable sort by start time; ties keep their existing (insertion) order.
pub fn sort_in_time_order(entries: &mut [&ScheduleEntry]) {
    entries.sort_by_key(|e| e.start_time);
}

/// Entries packed in `lane_id`, in time order
pub fn lane_members<'a>(
    entries: &'a [ScheduleEntry],
    tracks: &[Track],
    lane_id: &str,
) -> Vec<&'a ScheduleEntry> {
    let mut members: Vec<&ScheduleEntry> = entries
        .iter()
        .filter(|e| packing_lane(e, tracks) == Some(lane_id))
        .collect();
    sort_in_time_order(&mut members);
    members
}

/// Group entries by owning track, each group in time order.
///
/// Every known track gets a (possibly empty) group. Entries pointing at a
/// track that is not in `tracks` still get a group so callers can report them.
pub fn group_entries_by_track<'a>(
    entries: &'a [ScheduleEntry],
    tracks: &[Track],
) -> BTreeMap<String, Vec<&'a ScheduleEntry>> {
    let mut groups: BTreeMap<String, Vec<&ScheduleEntry>> = tracks
        .iter()
        .map(|t| (t.id.clone(), Vec::new()))
        .collect();

    for entry in entries {
        groups.entry(entry.track_id.clone()).or_default().push(entry);
    }
    for group in groups.values_mut() {
        sort_in_time_order(group);
    }
    groups
}

/// Ids of all lane tracks, in display order
pub fn lane_ids(tracks: &[Track]) -> Vec<&str> {
    let mut lanes: Vec<&Track> = tracks.iter().filter(|t| t.is_lane()).collect();
    lanes.sort_by_key(|t| t.order);
    lanes.into_iter().map(|t| t.id.as_str()).collect()
}
