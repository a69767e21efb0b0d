//! Resize command
//!
//! With cascade on everything after the entry in its lane follows the new
//! end; with cascade off only the duration changes.

use super::duration_from_words;
use super::schedule::{commit, load_schedule};
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{format_duration, plan_resize};

/// Change an entry's duration
#[derive(Debug, Args)]
pub struct ResizeCommand {
    /// Entry to resize
    pub entry: String,

    /// New duration, e.g. 45m or 1h 30m
    #[arg(required = true, num_args = 1..)]
    pub duration: Vec<String>,
}

impl ResizeCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let duration = duration_from_words(&self.duration)?;
        let loaded = load_schedule(db).await?;
        let batch = plan_resize(&loaded.snapshot, &self.entry, duration)?;
        commit(db, &batch).await?;

        Ok(ChangeSummary::describe(
            format!("Resized {} to {}", self.entry, format_duration(duration)),
            &loaded.snapshot,
            &batch,
        )
        .with_repaired(loaded.repaired))
    }
}
