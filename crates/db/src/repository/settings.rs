//! Settings repository
//!
//! A schedule has exactly one settings record, `settings:main`. Reading
//! before anything was saved yields the defaults.

use crate::error::{DbError, DbResult};
use serde::Deserialize;
use slate_timeline::{ScheduleSettings, TimeIncrement};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::debug;

/// Statement shared with batched writes
pub(crate) const UPSERT_SETTINGS: &str = r#"UPSERT settings:main SET
    day_start_time = $day_start_time,
    cascade_changes = $cascade_changes,
    time_increment = $time_increment"#;

/// Repository for the schedule settings record
pub struct SettingsRepository<'a> {
    client: &'a Surreal<Db>,
}

#[derive(Debug, Deserialize)]
struct SettingsRow {
    day_start_time: i64,
    cascade_changes: bool,
    time_increment: i64,
}

impl SettingsRow {
    fn into_settings(self) -> DbResult<ScheduleSettings> {
        let day_start_time = u32::try_from(self.day_start_time)
            .map_err(|_| DbError::validation(format!("Stored day start {} is invalid", self.day_start_time)))?;
        let time_increment = u32::try_from(self.time_increment)
            .map_err(|_| DbError::validation(format!("Stored time increment {} is invalid", self.time_increment)))
            .and_then(|minutes| TimeIncrement::try_from(minutes).map_err(DbError::validation))?;
        Ok(ScheduleSettings {
            day_start_time,
            cascade_changes: self.cascade_changes,
            time_increment,
        })
    }
}

impl<'a> SettingsRepository<'a> {
    pub fn new(client: &'a Surreal<Db>) -> Self {
        Self { client }
    }

    /// Load settings, falling back to defaults when none were saved
    pub async fn get(&self) -> DbResult<ScheduleSettings> {
        let mut result = self
            .client
            .query("SELECT day_start_time, cascade_changes, time_increment FROM settings:main")
            .await?;
        let row: Option<SettingsRow> = result.take(0)?;
        match row {
            Some(row) => row.into_settings(),
            None => {
                debug!("No settings stored, using defaults");
                Ok(ScheduleSettings::default())
            }
        }
    }

    /// Overwrite the settings record
    pub async fn save(&self, settings: &ScheduleSettings) -> DbResult<()> {
        debug!(
            "Saving settings: day_start={} cascade={} increment={}",
            settings.day_start_time,
            settings.cascade_changes,
            settings.time_increment.minutes()
        );
        self.client
            .query(UPSERT_SETTINGS)
            .bind(("day_start_time", i64::from(settings.day_start_time)))
            .bind(("cascade_changes", settings.cascade_changes))
            .bind(("time_increment", i64::from(settings.time_increment.minutes())))
            .await?
            .check()?;
        Ok(())
    }
}
