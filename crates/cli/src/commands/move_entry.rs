//! Move command
//!
//! Moves an entry to another track. With cascade on, the source lane closes
//! the gap and the entry lands in the destination lane by start time.

use super::schedule::{commit, load_schedule};
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::plan_cross_track_move;

/// Move an entry to another track
#[derive(Debug, Args)]
pub struct MoveCommand {
    /// Entry to move
    pub entry: String,

    /// Destination track
    pub track: String,
}

impl MoveCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let loaded = load_schedule(db).await?;
        let batch = plan_cross_track_move(&loaded.snapshot, &self.entry, &self.track)?;
        commit(db, &batch).await?;

        let headline = if batch.is_empty() {
            format!("{} is already on {}", self.entry, self.track)
        } else {
            format!("Moved {} to {}", self.entry, self.track)
        };
        Ok(ChangeSummary::describe(headline, &loaded.snapshot, &batch)
            .with_repaired(loaded.repaired))
    }
}
