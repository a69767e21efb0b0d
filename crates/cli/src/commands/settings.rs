//! Settings command
//!
//! Without options prints the current settings. Turning cascade back on
//! repacks the lanes on the next structural command.

use super::parse_increment;
use clap::{Args, ValueEnum};
use slate_db::{Database, DbError};
use slate_timeline::{ScheduleSettings, TimeIncrement, minutes_to_time_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Show or update schedule settings
#[derive(Debug, Args)]
pub struct SettingsCommand {
    /// Repack lanes automatically after each change
    #[arg(long, value_enum)]
    pub cascade: Option<Toggle>,

    /// Editor time increment in minutes (5, 15, 30)
    #[arg(long, value_parser = parse_increment)]
    pub increment: Option<TimeIncrement>,
}

#[derive(Debug)]
pub struct SettingsResult {
    pub settings: ScheduleSettings,
    pub changed: bool,
}

impl std::fmt::Display for SettingsResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.changed {
            writeln!(f, "Settings updated")?;
        }
        writeln!(
            f,
            "Day start: {}",
            minutes_to_time_string(self.settings.day_start_time)
        )?;
        writeln!(
            f,
            "Cascade:   {}",
            if self.settings.cascade_changes { "on" } else { "off" }
        )?;
        write!(f, "Increment: {}m", self.settings.time_increment.minutes())
    }
}

impl SettingsCommand {
    pub async fn execute(&self, db: &Database) -> Result<SettingsResult, DbError> {
        let current = db.settings().get().await?;
        let mut next = current;
        if let Some(cascade) = self.cascade {
            next.cascade_changes = cascade == Toggle::On;
        }
        if let Some(increment) = self.increment {
            next.time_increment = increment;
        }

        let changed = next != current;
        if changed {
            db.settings().save(&next).await?;
        }
        Ok(SettingsResult {
            settings: next,
            changed,
        })
    }
}
