//! Track repository
//!
//! Tracks are created once and listed in display order; the engine only
//! ever reads them.

use crate::error::{DbError, DbResult};
use serde::Deserialize;
use slate_timeline::{Track, TrackScope};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::debug;

/// Repository for track records
pub struct TrackRepository<'a> {
    client: &'a Surreal<Db>,
}

#[derive(Debug, Deserialize)]
struct TrackRow {
    id: surrealdb::sql::Thing,
    name: String,
    #[serde(default)]
    color: String,
    display_order: i64,
    scope: String,
}

impl TrackRow {
    fn into_track(self) -> DbResult<Track> {
        let id = self.id.id.to_raw();
        let order = u32::try_from(self.display_order).map_err(|_| {
            DbError::validation(format!(
                "Track '{}' has invalid display order {}",
                id, self.display_order
            ))
        })?;
        Ok(Track {
            id,
            name: self.name,
            color: self.color,
            order,
            scope: parse_scope(&self.scope),
        })
    }
}

/// Parse a stored scope string
fn parse_scope(s: &str) -> TrackScope {
    match s {
        "shared" => TrackScope::Shared,
        _ => TrackScope::Lane,
    }
}

impl<'a> TrackRepository<'a> {
    pub fn new(client: &'a Surreal<Db>) -> Self {
        Self { client }
    }

    /// Check whether a track exists
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Create a track under its own id.
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyExists` if the id is taken.
    pub async fn create(&self, track: &Track) -> DbResult<()> {
        if track.name.trim().is_empty() {
            return Err(DbError::validation("Track name cannot be empty"));
        }
        if self.exists(&track.id).await? {
            return Err(DbError::AlreadyExists {
                entity: "Track",
                id: track.id.clone(),
            });
        }

        debug!("Creating track: {} ({})", track.id, track.scope);
        self.client
            .query(
                r#"CREATE type::thing("track", $id) SET
                    name = $name,
                    color = $color,
                    display_order = $display_order,
                    scope = $scope"#,
            )
            .bind(("id", track.id.clone()))
            .bind(("name", track.name.clone()))
            .bind(("color", track.color.clone()))
            .bind(("display_order", i64::from(track.order)))
            .bind(("scope", track.scope.as_str()))
            .await?
            .check()?;
        Ok(())
    }

    /// Get a track by id
    pub async fn get(&self, id: &str) -> DbResult<Option<Track>> {
        let mut result = self
            .client
            .query(r#"SELECT id, name, color, display_order, scope FROM type::thing("track", $id)"#)
            .bind(("id", id.to_string()))
            .await?;
        let row: Option<TrackRow> = result.take(0)?;
        row.map(TrackRow::into_track).transpose()
    }

    /// All tracks in display order
    pub async fn list(&self) -> DbResult<Vec<Track>> {
        let mut result = self
            .client
            .query("SELECT id, name, color, display_order, scope FROM track ORDER BY display_order ASC")
            .await?;
        let rows: Vec<TrackRow> = result.take(0)?;
        debug!("Loaded {} tracks", rows.len());
        rows.into_iter().map(TrackRow::into_track).collect()
    }

    /// Display position for a newly added track
    pub async fn next_order(&self) -> DbResult<u32> {
        let tracks = self.list().await?;
        Ok(tracks
            .iter()
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0))
    }
}
