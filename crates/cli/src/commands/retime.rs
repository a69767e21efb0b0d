//! Retime command

use super::parse_clock;
use super::schedule::{commit, load_schedule};
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{minutes_to_time_string, plan_retime};

/// Change an entry's start time
#[derive(Debug, Args)]
pub struct RetimeCommand {
    /// Entry to retime
    pub entry: String,

    /// New start time (HH:MM)
    #[arg(value_parser = parse_clock)]
    pub time: u32,

    /// Round the time to the schedule's increment first
    #[arg(long)]
    pub snap: bool,
}

impl RetimeCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let loaded = load_schedule(db).await?;
        let start = if self.snap {
            loaded.snapshot.settings.time_increment.snap(self.time)
        } else {
            self.time
        };
        let batch = plan_retime(&loaded.snapshot, &self.entry, start)?;
        commit(db, &batch).await?;

        Ok(ChangeSummary::describe(
            format!("Retimed {} to {}", self.entry, minutes_to_time_string(start)),
            &loaded.snapshot,
            &batch,
        )
        .with_repaired(loaded.repaired))
    }
}
