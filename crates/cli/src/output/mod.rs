//! Output formatting module for Slate
//!
//! Table formatting for tracks, the call sheet, and the summary printed
//! after a schedule change.

mod call_sheet;

pub use call_sheet::{CallSheet, CallSheetEntry, CallSheetTrack};

use slate_timeline::{ScheduleSnapshot, Track, UpdateBatch, format_duration, minutes_to_time_string};

/// Maximum width for the title column before truncation
const MAX_TITLE_WIDTH: usize = 30;

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    }
}

/// Format tracks into an aligned table.
///
/// ```text
/// ID     Name   Scope   Color
/// -----  -----  ------  -------
/// photo  Photo  lane    #ff8800
/// ```
pub fn format_track_table(tracks: &[&Track]) -> String {
    if tracks.is_empty() {
        return "No tracks found.".to_string();
    }

    let headers = ["ID", "Name", "Scope", "Color"];
    let id_width = tracks
        .iter()
        .map(|t| t.id.len())
        .max()
        .unwrap_or(0)
        .max(headers[0].len());
    let name_width = tracks
        .iter()
        .map(|t| t.name.chars().count().min(MAX_TITLE_WIDTH))
        .max()
        .unwrap_or(0)
        .max(headers[1].len());
    let scope_width = headers[2].len().max("shared".len());

    let mut output = format!(
        "{:<id_w$}  {:<name_w$}  {:<scope_w$}  {}\n",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        id_w = id_width,
        name_w = name_width,
        scope_w = scope_width,
    );
    output.push_str(&format!(
        "{:->id_w$}  {:->name_w$}  {:->scope_w$}  {:->color_w$}\n",
        "",
        "",
        "",
        "",
        id_w = id_width,
        name_w = name_width,
        scope_w = scope_width,
        color_w = headers[3].len(),
    ));

    for track in tracks {
        let color = if track.color.is_empty() {
            "-"
        } else {
            track.color.as_str()
        };
        output.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {:<scope_w$}  {}\n",
            track.id,
            truncate(&track.name, MAX_TITLE_WIDTH),
            track.scope,
            color,
            id_w = id_width,
            name_w = name_width,
            scope_w = scope_width,
        ));
    }

    output.pop();
    output
}

/// Summary printed after a structural command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSummary {
    pub headline: String,
    /// One line per entry the change touched
    pub changes: Vec<String>,
    /// Entries repaired by the load-time normalization
    pub repaired: usize,
}

impl ChangeSummary {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            changes: Vec::new(),
            repaired: 0,
        }
    }

    /// Describe every update of `batch` against the values in `before`.
    pub fn describe(
        headline: impl Into<String>,
        before: &ScheduleSnapshot,
        batch: &UpdateBatch,
    ) -> Self {
        let mut summary = Self::new(headline);
        for update in batch.updates() {
            let Some(entry) = before.entry(&update.entry_id) else {
                continue;
            };
            let mut parts = Vec::new();
            if let Some(track_id) = &update.track_id
                && *track_id != entry.track_id
            {
                parts.push(format!("track {} -> {}", entry.track_id, track_id));
            }
            if let Some(targets) = &update.applies_to_track_ids
                && entry.applies_to_track_ids.as_ref() != Some(targets)
            {
                parts.push(format!("applies to {}", targets.join(", ")));
            }
            if let Some(start) = update.start_time
                && start != entry.start_time
            {
                parts.push(format!(
                    "{} -> {}",
                    minutes_to_time_string(entry.start_time),
                    minutes_to_time_string(start)
                ));
            }
            if let Some(duration) = update.duration
                && duration != entry.duration
            {
                parts.push(format!(
                    "{} -> {}",
                    format_duration(entry.duration),
                    format_duration(duration)
                ));
            }
            if !parts.is_empty() {
                summary
                    .changes
                    .push(format!("{} {}: {}", entry.id, entry.title, parts.join(", ")));
            }
        }
        summary
    }

    pub fn with_repaired(mut self, repaired: usize) -> Self {
        self.repaired = repaired;
        self
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.headline)?;
        for change in &self.changes {
            write!(f, "\n  {}", change)?;
        }
        if self.repaired > 0 {
            write!(
                f,
                "\n  ({} entries were repacked before the change)",
                self.repaired
            )?;
        }
        Ok(())
    }
}
