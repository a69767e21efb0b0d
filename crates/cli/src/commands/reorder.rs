//! Reorder command
//!
//! Positions are 1-based and count the other entries of the lane in time
//! order; a position past the end puts the entry last.

use super::schedule::{commit, load_schedule};
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::plan_move_within_track;

/// Move an entry to another position within its lane
#[derive(Debug, Args)]
pub struct ReorderCommand {
    /// Entry to move
    pub entry: String,

    /// New 1-based position in the lane
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub position: u32,
}

impl ReorderCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let loaded = load_schedule(db).await?;
        let index = usize::try_from(self.position.saturating_sub(1)).unwrap_or(usize::MAX);
        let batch = plan_move_within_track(&loaded.snapshot, &self.entry, index)?;
        commit(db, &batch).await?;

        Ok(ChangeSummary::describe(
            format!("Moved {} to position {}", self.entry, self.position),
            &loaded.snapshot,
            &batch,
        )
        .with_repaired(loaded.repaired))
    }
}
