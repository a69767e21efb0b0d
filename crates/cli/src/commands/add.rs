//! Add command for appending entries
//!
//! Implements `slate add`: the new entry goes right after the last entry of
//! the lane it will be packed in, or at the day start when that lane is
//! empty. Nothing else moves.

use super::duration_from_words;
use super::schedule::load_schedule;
use crate::id::IdGenerator;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{
    EntryKind, ScheduleEntry, format_duration, minutes_to_time_string, next_append_start,
};
use tracing::debug;

/// Append an entry to a track
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Title of the entry
    #[arg(required = true)]
    pub title: String,

    /// Track that owns the entry
    #[arg(short, long)]
    pub track: String,

    /// Duration, e.g. 45m, 1h 30m or 90
    #[arg(short, long, num_args = 1.., default_value = "30m")]
    pub duration: Vec<String>,

    /// Custom block (break, travel, meal) instead of a shot
    #[arg(long)]
    pub custom: bool,

    /// Lane the entry spans (repeatable); makes the entry a banner
    #[arg(long = "applies-to")]
    pub applies_to: Vec<String>,
}

/// Result of a successful add
#[derive(Debug)]
pub struct AddResult {
    pub entry: ScheduleEntry,
    pub repaired: usize,
}

impl std::fmt::Display for AddResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Added {} '{}' on {} at {}-{} ({})",
            self.entry.id,
            self.entry.title,
            self.entry.track_id,
            minutes_to_time_string(self.entry.start_time),
            minutes_to_time_string(self.entry.end_time()),
            format_duration(self.entry.duration)
        )?;
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

impl AddCommand {
    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if:
    /// - The title is empty
    /// - The owning track or a banner target does not exist
    /// - The duration is not positive or the entry would end after 24:00
    pub async fn execute(&self, db: &Database) -> Result<AddResult, DbError> {
        if self.title.trim().is_empty() {
            return Err(DbError::validation("Entry title cannot be empty"));
        }
        let duration = duration_from_words(&self.duration)?;

        let loaded = load_schedule(db).await?;
        let snapshot = &loaded.snapshot;
        for target in &self.applies_to {
            snapshot.require_track(target)?;
        }

        let id = self.generate_unique_id(db).await?;
        let mut entry = ScheduleEntry::new(id, self.track.clone(), 0, duration)
            .with_title(self.title.trim())
            .with_kind(if self.custom {
                EntryKind::Custom
            } else {
                EntryKind::Shot
            });
        if !self.applies_to.is_empty() {
            entry = entry.applies_to(self.applies_to.iter().cloned());
        }

        entry.start_time = next_append_start(snapshot, &entry)?;
        debug!(
            entry_id = %entry.id,
            start = entry.start_time,
            "Appending entry"
        );
        db.entries().create(&entry).await?;

        Ok(AddResult {
            entry,
            repaired: loaded.repaired,
        })
    }

    /// Generate an id no record (deleted or not) already uses.
    async fn generate_unique_id(&self, db: &Database) -> Result<String, DbError> {
        let mut generator = IdGenerator::new(&self.title);

        while let Some(id) = generator.next_id() {
            if !db.entries().exists(&id).await? {
                return Ok(id);
            }
        }

        Err(DbError::validation(
            "Failed to generate a unique entry id after maximum retries",
        ))
    }
}
