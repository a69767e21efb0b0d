//! Track commands
//!
//! `slate track add` creates a lane (or a shared track with `--shared`);
//! `slate track list` prints them in display order.

use crate::id::slugify;
use crate::output::format_track_table;
use clap::{Args, Subcommand};
use slate_db::{Database, DbError};
use slate_timeline::{Track, TrackScope};

#[derive(Debug, Subcommand)]
pub enum TrackCommand {
    /// Create a track
    Add(TrackAddCommand),

    /// List tracks in display order
    List,
}

/// Create a track
#[derive(Debug, Args)]
pub struct TrackAddCommand {
    /// Display name of the track
    #[arg(required = true)]
    pub name: String,

    /// Track id (derived from the name when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Display color, e.g. #ff8800
    #[arg(long, default_value = "")]
    pub color: String,

    /// Shared track: its entries are never packed into a lane
    #[arg(long)]
    pub shared: bool,
}

impl TrackCommand {
    pub async fn execute(&self, db: &Database) -> Result<String, DbError> {
        match self {
            TrackCommand::Add(cmd) => {
                let track = cmd.execute(db).await?;
                Ok(format!(
                    "Created {} track '{}' ({})",
                    track.scope, track.id, track.name
                ))
            }
            TrackCommand::List => {
                let snapshot = db.snapshot().await?;
                Ok(format_track_table(&snapshot.tracks_in_order()))
            }
        }
    }
}

impl TrackAddCommand {
    /// Create the track after the last one in display order.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a blank name or an id with no usable
    /// characters, `AlreadyExists` if the id is taken.
    pub async fn execute(&self, db: &Database) -> Result<Track, DbError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DbError::validation("Track name cannot be empty"));
        }
        let id = slugify(self.id.as_deref().unwrap_or(name));
        if id.is_empty() {
            return Err(DbError::validation(format!(
                "Cannot derive a track id from '{}'; pass --id",
                self.id.as_deref().unwrap_or(name)
            )));
        }

        let order = db.tracks().next_order().await?;
        let track = Track {
            id,
            name: name.to_string(),
            color: self.color.clone(),
            order,
            scope: if self.shared {
                TrackScope::Shared
            } else {
                TrackScope::Lane
            },
        };
        db.tracks().create(&track).await?;
        Ok(track)
    }
}
