//! Remove command
//!
//! Soft-deletes by default so the record stays on disk; `--hard` drops it.
//! With cascade on, the rest of the lane closes up behind it. The delete and
//! the repack are written in one transaction.

use super::schedule::load_schedule;
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError, DeleteMode};
use slate_timeline::plan_removal;

/// Remove an entry
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Entry to remove
    pub entry: String,

    /// Delete the record instead of marking it deleted
    #[arg(long)]
    pub hard: bool,
}

impl RemoveCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let loaded = load_schedule(db).await?;
        let snapshot = &loaded.snapshot;
        let batch = plan_removal(snapshot, &self.entry)?;

        let mode = if self.hard {
            DeleteMode::Hard
        } else {
            DeleteMode::Soft
        };
        db.entries()
            .remove_with_batch(&self.entry, mode, &batch)
            .await?;

        let title = snapshot
            .entry(&self.entry)
            .map(|e| e.title.as_str())
            .unwrap_or_default();
        Ok(ChangeSummary::describe(
            format!("Removed {} '{}'", self.entry, title),
            snapshot,
            &batch,
        )
        .with_repaired(loaded.repaired))
    }
}
