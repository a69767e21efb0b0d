//! Data model for a single shoot day
//!
//! Tracks, entries and settings as the engine sees them. All times are
//! minutes since midnight; see [`crate::time`].

use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::time::MINUTES_PER_DAY;

/// Whether a track is packed on its own or overlays several lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackScope {
    /// Independent work stream, packed gapless on its own
    Lane,
    /// Cross-lane banner track, never packed as a single lane
    Shared,
}

impl TrackScope {
    /// Returns the string representation used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackScope::Lane => "lane",
            TrackScope::Shared => "shared",
        }
    }
}

impl std::fmt::Display for TrackScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an entry represents; opaque to packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Shot,
    Custom,
}

impl EntryKind {
    /// Returns the string representation used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Shot => "shot",
            EntryKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parallel work stream on the day's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Display order
    pub order: u32,
    pub scope: TrackScope,
}

impl Track {
    /// Create a lane track
    pub fn lane(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            order,
            scope: TrackScope::Lane,
        }
    }

    /// Create a shared (banner) track
    pub fn shared(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            scope: TrackScope::Shared,
            ..Self::lane(id, name, order)
        }
    }

    /// Set the display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_lane(&self) -> bool {
        self.scope == TrackScope::Lane
    }
}

/// One item placed on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub track_id: String,
    #[serde(default)]
    pub title: String,
    /// Minute of day, 0..=1439
    pub start_time: u32,
    /// Minutes, always > 0 for a valid entry
    pub duration: u32,
    pub kind: EntryKind,
    /// Lanes a banner entry spans; `None` for ordinary lane entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_track_ids: Option<Vec<String>>,
}

impl ScheduleEntry {
    /// Create a shot entry on a track
    pub fn new(
        id: impl Into<String>,
        track_id: impl Into<String>,
        start_time: u32,
        duration: u32,
    ) -> Self {
        Self {
            id: id.into(),
            track_id: track_id.into(),
            title: String::new(),
            start_time,
            duration,
            kind: EntryKind::Shot,
            applies_to_track_ids: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the entry as a banner spanning the given lanes
    pub fn applies_to<I, S>(mut self, track_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to_track_ids = Some(track_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Minute the entry ends (exclusive)
    pub fn end_time(&self) -> u32 {
        self.start_time.saturating_add(self.duration)
    }

    /// Lane a banner targets when it names exactly one
    ///
    /// Such a banner is packed as if it were local to that lane.
    pub fn single_target(&self) -> Option<&str> {
        match self.applies_to_track_ids.as_deref() {
            Some([only]) => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Minute granularity offered by editors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeIncrement {
    Five,
    #[default]
    Fifteen,
    Thirty,
}

impl TimeIncrement {
    pub fn minutes(&self) -> u32 {
        match self {
            TimeIncrement::Five => 5,
            TimeIncrement::Fifteen => 15,
            TimeIncrement::Thirty => 30,
        }
    }

    /// Round to the nearest increment (halves round up)
    ///
    /// Input affordance only; packing never snaps.
    pub fn snap(&self, minutes: u32) -> u32 {
        let step = self.minutes();
        ((minutes + step / 2) / step) * step
    }
}

impl TryFrom<u32> for TimeIncrement {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(TimeIncrement::Five),
            15 => Ok(TimeIncrement::Fifteen),
            30 => Ok(TimeIncrement::Thirty),
            other => Err(format!(
                "invalid time increment '{}'. Valid values: 5, 15, 30",
                other
            )),
        }
    }
}

impl From<TimeIncrement> for u32 {
    fn from(value: TimeIncrement) -> Self {
        value.minutes()
    }
}

/// Schedule-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Anchor for lanes that have no entries yet
    pub day_start_time: u32,
    /// Repack a lane automatically after each structural change
    pub cascade_changes: bool,
    pub time_increment: TimeIncrement,
}

/// 06:00
pub const DEFAULT_DAY_START: u32 = 360;

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            day_start_time: DEFAULT_DAY_START,
            cascade_changes: true,
            time_increment: TimeIncrement::default(),
        }
    }
}

/// Read-only view of one schedule handed to every engine call
///
/// `entries` must be in insertion order; that order breaks start-time ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub tracks: Vec<Track>,
    pub entries: Vec<ScheduleEntry>,
    pub settings: ScheduleSettings,
}

impl ScheduleSnapshot {
    pub fn new(
        tracks: Vec<Track>,
        entries: Vec<ScheduleEntry>,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            tracks,
            entries,
            settings,
        }
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Look up a track, failing with `UnknownTrack`
    pub fn require_track(&self, track_id: &str) -> TimelineResult<&Track> {
        self.track(track_id)
            .ok_or_else(|| TimelineError::UnknownTrack {
                track_id: track_id.to_string(),
            })
    }

    pub fn entry(&self, entry_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Look up an entry, failing with `UnknownEntry`
    pub fn require_entry(&self, entry_id: &str) -> TimelineResult<&ScheduleEntry> {
        self.entry(entry_id)
            .ok_or_else(|| TimelineError::UnknownEntry {
                entry_id: entry_id.to_string(),
            })
    }

    /// Tracks sorted by display order
    pub fn tracks_in_order(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.iter().collect();
        tracks.sort_by_key(|t| t.order);
        tracks
    }
}

/// A single start-time change produced by packing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimeUpdate {
    pub entry_id: String,
    pub start_time: u32,
}

impl StartTimeUpdate {
    pub fn new(entry_id: impl Into<String>, start_time: u32) -> Self {
        Self {
            entry_id: entry_id.into(),
            start_time,
        }
    }
}

/// Fields to write for one entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub entry_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Replacement banner targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to_track_ids: Option<Vec<String>>,
}

impl EntryUpdate {
    pub fn new(entry_id: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            ..Self::default()
        }
    }

    /// Check if any field is set
    pub fn has_updates(&self) -> bool {
        self.start_time.is_some()
            || self.track_id.is_some()
            || self.duration.is_some()
            || self.applies_to_track_ids.is_some()
    }
}

/// Ordered set of entry updates applied as one atomic write
///
/// Keyed by entry id: merging a second update for the same entry combines
/// fields into the existing record instead of adding a conflicting one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBatch {
    updates: Vec<EntryUpdate>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, entry_id: &str) -> &mut EntryUpdate {
        let index = match self.updates.iter().position(|u| u.entry_id == entry_id) {
            Some(index) => index,
            None => {
                self.updates.push(EntryUpdate::new(entry_id));
                self.updates.len() - 1
            }
        };
        &mut self.updates[index]
    }

    pub fn set_start_time(&mut self, entry_id: &str, start_time: u32) {
        self.slot(entry_id).start_time = Some(start_time);
    }

    pub fn set_track(&mut self, entry_id: &str, track_id: &str) {
        self.slot(entry_id).track_id = Some(track_id.to_string());
    }

    pub fn set_duration(&mut self, entry_id: &str, duration: u32) {
        self.slot(entry_id).duration = Some(duration);
    }

    pub fn set_applies_to(&mut self, entry_id: &str, track_ids: Vec<String>) {
        self.slot(entry_id).applies_to_track_ids = Some(track_ids);
    }

    /// Merge a packing diff into the batch
    pub fn merge_start_times(&mut self, updates: impl IntoIterator<Item = StartTimeUpdate>) {
        for update in updates {
            self.set_start_time(&update.entry_id, update.start_time);
        }
    }

    pub fn get(&self, entry_id: &str) -> Option<&EntryUpdate> {
        self.updates.iter().find(|u| u.entry_id == entry_id)
    }

    pub fn updates(&self) -> &[EntryUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Apply the batch to an in-memory entry list
    ///
    /// Used to preview a change; persistence is the store's job.
    pub fn apply_to(&self, entries: &mut [ScheduleEntry]) {
        for update in &self.updates {
            if let Some(entry) = entries.iter_mut().find(|e| e.id == update.entry_id) {
                if let Some(start_time) = update.start_time {
                    entry.start_time = start_time;
                }
                if let Some(track_id) = &update.track_id {
                    entry.track_id = track_id.clone();
                }
                if let Some(duration) = update.duration {
                    entry.duration = duration;
                }
                if let Some(targets) = &update.applies_to_track_ids {
                    entry.applies_to_track_ids = Some(targets.clone());
                }
            }
        }
    }
}

impl IntoIterator for UpdateBatch {
    type Item = EntryUpdate;
    type IntoIter = std::vec::IntoIter<EntryUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

/// Fail with `OutOfDayRange` unless `[start, end]` lies inside the day
pub fn ensure_within_day(start: i64, end: i64) -> TimelineResult<()> {
    if start < 0 || end > i64::from(MINUTES_PER_DAY) {
        return Err(TimelineError::OutOfDayRange {
            earliest_start: start,
            latest_end: end,
        });
    }
    Ok(())
}

static_assertions::assert_impl_all!(ScheduleSnapshot: Send, Sync);
static_assertions::assert_impl_all!(UpdateBatch: Send, Sync);
