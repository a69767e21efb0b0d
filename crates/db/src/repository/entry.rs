//! Entry repository
//!
//! Entries carry a creation sequence number so the store can hand the
//! engine its entries in insertion order. Batches computed by the engine
//! are written in a single transaction.

use crate::error::{DbError, DbResult};
use crate::repository::settings::UPSERT_SETTINGS;
use serde::Deserialize;
use slate_timeline::{EntryKind, ScheduleEntry, ScheduleSettings, UpdateBatch};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, trace};

/// Repository for schedule entry records
pub struct EntryRepository<'a> {
    client: &'a Surreal<Db>,
}

#[derive(Debug, Deserialize)]
struct EntryRow {
    id: surrealdb::sql::Thing,
    track_id: String,
    #[serde(default)]
    title: String,
    kind: String,
    start_time: i64,
    duration: i64,
    #[serde(default)]
    applies_to: Option<Vec<String>>,
}

impl EntryRow {
    fn into_entry(self) -> DbResult<ScheduleEntry> {
        let id = self.id.id.to_raw();
        let start_time = u32::try_from(self.start_time).map_err(|_| {
            DbError::validation(format!("Entry '{}' has invalid start {}", id, self.start_time))
        })?;
        let duration = u32::try_from(self.duration).map_err(|_| {
            DbError::validation(format!("Entry '{}' has invalid duration {}", id, self.duration))
        })?;
        Ok(ScheduleEntry {
            id,
            track_id: self.track_id,
            title: self.title,
            start_time,
            duration,
            kind: parse_kind(&self.kind),
            applies_to_track_ids: self.applies_to,
        })
    }
}

/// Parse a stored kind string
fn parse_kind(s: &str) -> EntryKind {
    match s {
        "custom" => EntryKind::Custom,
        _ => EntryKind::Shot,
    }
}

const SELECT_FIELDS: &str = "id, track_id, title, kind, start_time, duration, applies_to, seq";

/// Query text plus bound parameters for one batch
#[derive(Debug, Default)]
struct BatchStatements {
    statements: Vec<String>,
    strings: Vec<(String, String)>,
    ints: Vec<(String, i64)>,
    bools: Vec<(String, bool)>,
    lists: Vec<(String, Vec<String>)>,
}

/// How `remove_with_batch` drops the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Mark the record deleted; the id stays reserved
    Soft,
    /// Remove the record
    Hard,
}

impl BatchStatements {
    fn from_batch(batch: &UpdateBatch) -> Self {
        let mut out = Self::default();
        for (i, update) in batch.updates().iter().enumerate() {
            let mut assignments = Vec::new();
            if let Some(start_time) = update.start_time {
                assignments.push(format!("start_time = $start_{i}"));
                out.ints.push((format!("start_{i}"), i64::from(start_time)));
            }
            if let Some(duration) = update.duration {
                assignments.push(format!("duration = $duration_{i}"));
                out.ints.push((format!("duration_{i}"), i64::from(duration)));
            }
            if let Some(track_id) = &update.track_id {
                assignments.push(format!("track_id = $track_{i}"));
                out.strings.push((format!("track_{i}"), track_id.clone()));
            }
            if let Some(targets) = &update.applies_to_track_ids {
                assignments.push(format!("applies_to = $applies_to_{i}"));
                out.lists.push((format!("applies_to_{i}"), targets.clone()));
            }
            if assignments.is_empty() {
                continue;
            }
            out.strings.push((format!("id_{i}"), update.entry_id.clone()));
            out.statements.push(format!(
                r#"UPDATE type::thing("entry", $id_{i}) SET {}"#,
                assignments.join(", ")
            ));
        }
        out
    }

    /// Append the settings upsert to the same transaction
    fn push_settings(&mut self, settings: &ScheduleSettings) {
        self.statements.push(UPSERT_SETTINGS.to_string());
        self.ints.push(("day_start_time".to_string(), i64::from(settings.day_start_time)));
        self.ints.push((
            "time_increment".to_string(),
            i64::from(settings.time_increment.minutes()),
        ));
        self.bools
            .push(("cascade_changes".to_string(), settings.cascade_changes));
    }

    /// Put the delete ahead of the updates in the same transaction
    fn push_delete(&mut self, id: &str, mode: DeleteMode) {
        let statement = match mode {
            DeleteMode::Soft => {
                r#"UPDATE type::thing("entry", $delete_id) SET deleted_at = time::now()"#
            }
            DeleteMode::Hard => r#"DELETE type::thing("entry", $delete_id)"#,
        };
        self.statements.insert(0, statement.to_string());
        self.strings.push(("delete_id".to_string(), id.to_string()));
    }

    fn sql(&self) -> String {
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for statement in &self.statements {
            sql.push_str(statement);
            sql.push_str(";\n");
        }
        sql.push_str("COMMIT TRANSACTION;");
        sql
    }
}

impl<'a> EntryRepository<'a> {
    pub fn new(client: &'a Surreal<Db>) -> Self {
        Self { client }
    }

    /// Create an entry, assigning it the next sequence number.
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyExists` if the id is taken and
    /// `DbError::ValidationError` for a zero duration or a start past the
    /// last minute of the day.
    pub async fn create(&self, entry: &ScheduleEntry) -> DbResult<()> {
        if entry.duration == 0 {
            return Err(DbError::validation("Entry duration must be positive"));
        }
        if entry.start_time >= slate_timeline::MINUTES_PER_DAY {
            return Err(DbError::validation(format!(
                "Entry start {} is past the end of the day",
                entry.start_time
            )));
        }
        if self.exists(&entry.id).await? {
            return Err(DbError::AlreadyExists {
                entity: "Entry",
                id: entry.id.clone(),
            });
        }

        let seq = self.next_seq().await?;
        debug!(
            "Creating entry: {} on track {} at {} (seq {})",
            entry.id, entry.track_id, entry.start_time, seq
        );
        trace!("Entry data: {:?}", entry);

        self.client
            .query(
                r#"CREATE type::thing("entry", $id) SET
                    track_id = $track_id,
                    title = $title,
                    kind = $kind,
                    start_time = $start_time,
                    duration = $duration,
                    applies_to = $applies_to,
                    seq = $seq"#,
            )
            .bind(("id", entry.id.clone()))
            .bind(("track_id", entry.track_id.clone()))
            .bind(("title", entry.title.clone()))
            .bind(("kind", entry.kind.as_str()))
            .bind(("start_time", i64::from(entry.start_time)))
            .bind(("duration", i64::from(entry.duration)))
            .bind(("applies_to", entry.applies_to_track_ids.clone()))
            .bind(("seq", seq))
            .await?
            .check()?;
        Ok(())
    }

    /// Get an active (not deleted) entry by id
    pub async fn get(&self, id: &str) -> DbResult<Option<ScheduleEntry>> {
        let mut result = self
            .client
            .query(format!(
                r#"SELECT {SELECT_FIELDS} FROM type::thing("entry", $id) WHERE deleted_at = NONE"#
            ))
            .bind(("id", id.to_string()))
            .await?;
        let row: Option<EntryRow> = result.take(0)?;
        row.map(EntryRow::into_entry).transpose()
    }

    /// Active entries in insertion order
    pub async fn list_active(&self) -> DbResult<Vec<ScheduleEntry>> {
        let mut result = self
            .client
            .query(format!(
                "SELECT {SELECT_FIELDS} FROM entry WHERE deleted_at = NONE ORDER BY seq ASC"
            ))
            .await?;
        let rows: Vec<EntryRow> = result.take(0)?;
        debug!("Loaded {} active entries", rows.len());
        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    /// Mark an entry deleted; it disappears from snapshots but stays on disk.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        self.remove_with_batch(id, DeleteMode::Soft, &UpdateBatch::new())
            .await
            .map(|_| ())
    }

    /// Remove an entry record entirely
    pub async fn hard_delete(&self, id: &str) -> DbResult<()> {
        self.remove_with_batch(id, DeleteMode::Hard, &UpdateBatch::new())
            .await
            .map(|_| ())
    }

    /// Delete an entry and write the batch that closes its gap, in one
    /// transaction.
    ///
    /// Returns the number of entries updated by the batch.
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` when a soft delete targets a missing or already
    /// deleted entry, or a hard delete targets a missing record. Nothing is
    /// written when any statement fails.
    pub async fn remove_with_batch(
        &self,
        id: &str,
        mode: DeleteMode,
        batch: &UpdateBatch,
    ) -> DbResult<usize> {
        match mode {
            DeleteMode::Soft => {
                self.require_active(id).await?;
            }
            DeleteMode::Hard => {
                if !self.exists(id).await? {
                    return Err(DbError::NotFound {
                        entity: "Entry",
                        id: id.to_string(),
                    });
                }
            }
        }

        let mut statements = BatchStatements::from_batch(batch);
        let written = statements.statements.len();
        statements.push_delete(id, mode);
        debug!("Removing entry {} ({:?}) with {} updates", id, mode, written);
        self.run(statements).await?;
        Ok(written)
    }

    /// Write every update of a batch in one transaction.
    ///
    /// Returns the number of records written; an empty batch writes nothing.
    pub async fn apply_batch(&self, batch: &UpdateBatch) -> DbResult<usize> {
        self.apply_batch_with_settings(batch, None).await
    }

    /// Write a batch and, optionally, new settings in one transaction.
    pub async fn apply_batch_with_settings(
        &self,
        batch: &UpdateBatch,
        settings: Option<&ScheduleSettings>,
    ) -> DbResult<usize> {
        let mut statements = BatchStatements::from_batch(batch);
        let written = statements.statements.len();
        if written == 0 && settings.is_none() {
            debug!("Empty batch, nothing to write");
            return Ok(0);
        }
        if let Some(settings) = settings {
            statements.push_settings(settings);
        }

        debug!("Applying batch of {} entry updates", written);
        self.run(statements).await?;
        Ok(written)
    }

    async fn run(&self, statements: BatchStatements) -> DbResult<()> {
        let sql = statements.sql();
        trace!("Batch query: {}", sql);

        let mut query = self.client.query(sql);
        for binding in statements.strings {
            query = query.bind(binding);
        }
        for binding in statements.ints {
            query = query.bind(binding);
        }
        for binding in statements.bools {
            query = query.bind(binding);
        }
        for binding in statements.lists {
            query = query.bind(binding);
        }
        query.await?.check()?;
        Ok(())
    }

    /// Whether a record exists, deleted or not
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let mut result = self
            .client
            .query(r#"SELECT VALUE id FROM type::thing("entry", $id)"#)
            .bind(("id", id.to_string()))
            .await?;
        let ids: Vec<surrealdb::sql::Thing> = result.take(0)?;
        Ok(!ids.is_empty())
    }

    async fn require_active(&self, id: &str) -> DbResult<ScheduleEntry> {
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "Entry",
            id: id.to_string(),
        })
    }

    async fn next_seq(&self) -> DbResult<i64> {
        let mut result = self
            .client
            .query("SELECT VALUE seq FROM entry ORDER BY seq DESC LIMIT 1")
            .await?;
        let last: Vec<i64> = result.take(0)?;
        Ok(last.first().map_or(1, |seq| seq + 1))
    }
}
