//! Day-start command
//!
//! Shifts every entry by the same amount so the earliest lane entry starts at the
//! new day start. The shifted entries and the new setting are written in
//! one transaction.

use super::parse_clock;
use super::schedule::load_schedule;
use crate::output::ChangeSummary;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{compute_day_start_shift, format_duration, minutes_to_time_string};

/// Shift the whole day to a new start time
#[derive(Debug, Args)]
pub struct DayStartCommand {
    /// New day start (HH:MM)
    #[arg(value_parser = parse_clock)]
    pub time: u32,
}

impl DayStartCommand {
    pub async fn execute(&self, db: &Database) -> Result<ChangeSummary, DbError> {
        let loaded = load_schedule(db).await?;
        let snapshot = &loaded.snapshot;
        let shift = compute_day_start_shift(
            &snapshot.entries,
            &snapshot.tracks,
            &snapshot.settings,
            self.time,
        )?;

        db.entries()
            .apply_batch_with_settings(&shift.updates, Some(&shift.next_settings))
            .await?;

        let headline = match shift.delta {
            0 => format!("Day start set to {}", minutes_to_time_string(self.time)),
            delta => format!(
                "Day start set to {} (entries moved {} {})",
                minutes_to_time_string(self.time),
                format_duration(u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX)),
                if delta > 0 { "later" } else { "earlier" }
            ),
        };
        Ok(ChangeSummary::describe(headline, snapshot, &shift.updates)
            .with_repaired(loaded.repaired))
    }
}
