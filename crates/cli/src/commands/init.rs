//! Init command
//!
//! Implements `slate init`: the store itself is created when the CLI
//! connects, so this only writes the schedule settings. Changing the day
//! start of a schedule that already has entries belongs to `slate day-start`.

use super::{parse_clock, parse_increment};
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{ScheduleSettings, TimeIncrement, minutes_to_time_string};
use std::path::PathBuf;

/// Initialize a schedule
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Day start used to anchor empty tracks (HH:MM)
    #[arg(long, value_parser = parse_clock)]
    pub day_start: Option<u32>,

    /// Editor time increment in minutes (5, 15, 30)
    #[arg(long, value_parser = parse_increment)]
    pub increment: Option<TimeIncrement>,

    /// Turn off automatic repacking after each change
    #[arg(long)]
    pub no_cascade: bool,
}

/// Result of the init command execution
#[derive(Debug)]
pub struct InitResult {
    pub db_path: PathBuf,
    pub settings: ScheduleSettings,
    /// Entries already in the store
    pub existing_entries: usize,
}

impl std::fmt::Display for InitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schedule initialized at {}", self.db_path.display())?;
        writeln!(
            f,
            "  Day start: {}",
            minutes_to_time_string(self.settings.day_start_time)
        )?;
        writeln!(
            f,
            "  Cascade:   {}",
            if self.settings.cascade_changes { "on" } else { "off" }
        )?;
        write!(
            f,
            "  Increment: {}m",
            self.settings.time_increment.minutes()
        )?;
        if self.existing_entries > 0 {
            write!(
                f,
                "\n  {} existing entries kept; use 'slate day-start' to move them",
                self.existing_entries
            )?;
        }
        Ok(())
    }
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Options not given keep their stored value (or the default on a fresh
    /// store); `--no-cascade` always turns cascade off.
    pub async fn execute(&self, db: &Database) -> Result<InitResult, DbError> {
        let mut settings = db.settings().get().await?;
        if let Some(day_start) = self.day_start {
            settings.day_start_time = day_start;
        }
        if let Some(increment) = self.increment {
            settings.time_increment = increment;
        }
        if self.no_cascade {
            settings.cascade_changes = false;
        }
        db.settings().save(&settings).await?;

        let existing_entries = db.entries().list_active().await?.len();
        Ok(InitResult {
            db_path: db.path().to_path_buf(),
            settings,
            existing_entries,
        })
    }
}
