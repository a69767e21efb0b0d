//! Normalize command
//!
//! One-time repair over every lane, regardless of the cascade setting.
//! Lanes that would overflow the day are reported and left alone.

use super::schedule::commit;
use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{TimelineError, normalize_all_lanes};

/// Repack every lane so it has no gaps or overlaps
#[derive(Debug, Args)]
pub struct NormalizeCommand {}

#[derive(Debug)]
pub struct NormalizeResult {
    pub updated: usize,
    pub skipped: Vec<(String, TimelineError)>,
}

impl std::fmt::Display for NormalizeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.updated == 0 {
            write!(f, "All lanes already gapless")?;
        } else {
            write!(f, "Normalized {} entries", self.updated)?;
        }
        for (track_id, err) in &self.skipped {
            write!(f, "\n  Skipped {}: {}", track_id, err)?;
        }
        Ok(())
    }
}

impl NormalizeCommand {
    pub async fn execute(&self, db: &Database) -> Result<NormalizeResult, DbError> {
        let snapshot = db.snapshot().await?;
        let outcome = normalize_all_lanes(&snapshot);
        let updated = commit(db, &outcome.batch).await?;
        Ok(NormalizeResult {
            updated,
            skipped: outcome.skipped,
        })
    }
}
