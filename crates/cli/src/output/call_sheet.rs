//! Call sheet view of a schedule
//!
//! Entries grouped by owning track in display order, each group in time
//! order. Serializes to JSON for `slate show --json`.

use serde::Serialize;
use slate_timeline::{
    EntryKind, ScheduleEntry, ScheduleSnapshot, TrackScope, format_duration,
    group_entries_by_track, minutes_to_time_string,
};

use super::truncate;

const MAX_TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, Serialize)]
pub struct CallSheet {
    pub day_start: String,
    pub cascade_changes: bool,
    pub time_increment: u32,
    pub tracks: Vec<CallSheetTrack>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallSheetTrack {
    pub id: String,
    pub name: String,
    pub color: String,
    /// `None` for a track id referenced by entries but missing from the schedule
    pub scope: Option<TrackScope>,
    pub entries: Vec<CallSheetEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallSheetEntry {
    pub id: String,
    pub title: String,
    pub kind: EntryKind,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub start_minutes: u32,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<Vec<String>>,
}

impl From<&ScheduleEntry> for CallSheetEntry {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            kind: entry.kind,
            start: minutes_to_time_string(entry.start_time),
            end: minutes_to_time_string(entry.end_time()),
            duration: format_duration(entry.duration),
            start_minutes: entry.start_time,
            duration_minutes: entry.duration,
            applies_to: entry.applies_to_track_ids.clone(),
        }
    }
}

impl CallSheet {
    pub fn from_snapshot(snapshot: &ScheduleSnapshot) -> Self {
        let mut groups = group_entries_by_track(&snapshot.entries, &snapshot.tracks);

        let mut tracks: Vec<CallSheetTrack> = snapshot
            .tracks_in_order()
            .into_iter()
            .map(|track| CallSheetTrack {
                id: track.id.clone(),
                name: track.name.clone(),
                color: track.color.clone(),
                scope: Some(track.scope),
                entries: groups
                    .remove(&track.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(CallSheetEntry::from)
                    .collect(),
            })
            .collect();

        // Whatever is left points at tracks that no longer exist
        tracks.extend(groups.into_iter().map(|(id, entries)| CallSheetTrack {
            name: id.clone(),
            id,
            color: String::new(),
            scope: None,
            entries: entries.into_iter().map(CallSheetEntry::from).collect(),
        }));

        Self {
            day_start: minutes_to_time_string(snapshot.settings.day_start_time),
            cascade_changes: snapshot.settings.cascade_changes,
            time_increment: snapshot.settings.time_increment.minutes(),
            tracks,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.tracks.iter().map(|t| t.entries.len()).sum()
    }
}

impl std::fmt::Display for CallSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Day start: {}  Cascade: {}  Increment: {}m",
            self.day_start,
            if self.cascade_changes { "on" } else { "off" },
            self.time_increment
        )?;

        if self.tracks.is_empty() {
            return write!(f, "\nNo tracks yet. Add one with 'slate track add <name>'.");
        }

        let id_width = self
            .tracks
            .iter()
            .flat_map(|t| t.entries.iter().map(|e| e.id.len()))
            .max()
            .unwrap_or(0);
        let duration_width = self
            .tracks
            .iter()
            .flat_map(|t| t.entries.iter().map(|e| e.duration.len()))
            .max()
            .unwrap_or(0);

        for track in &self.tracks {
            writeln!(f)?;
            match track.scope {
                Some(TrackScope::Shared) => writeln!(f, "== {} [{}] (shared) ==", track.name, track.id)?,
                Some(TrackScope::Lane) => writeln!(f, "== {} [{}] ==", track.name, track.id)?,
                None => writeln!(f, "== {} (missing track) ==", track.id)?,
            }
            if track.entries.is_empty() {
                writeln!(f, "  (no entries)")?;
                continue;
            }
            for entry in &track.entries {
                write!(
                    f,
                    "  {}-{}  {:>dur_w$}  {:<id_w$}  {}",
                    entry.start,
                    entry.end,
                    entry.duration,
                    entry.id,
                    truncate(&entry.title, MAX_TITLE_WIDTH),
                    dur_w = duration_width,
                    id_w = id_width,
                )?;
                if entry.kind == EntryKind::Custom {
                    write!(f, "  (custom)")?;
                }
                if let Some(targets) = &entry.applies_to {
                    write!(f, "  -> {}", targets.join(", "))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
