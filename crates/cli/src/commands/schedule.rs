//! Load and commit steps shared by the structural commands
//!
//! Every structural command works on a fresh snapshot. With cascade on, the
//! lanes are normalized before the command plans its own change, so a
//! schedule edited by hand (or written with cascade off) is repaired first.

use slate_db::{Database, DbError};
use slate_timeline::{ScheduleSnapshot, UpdateBatch, normalize_all_lanes};
use tracing::{debug, warn};

/// Snapshot ready for planning
pub(crate) struct LoadedSchedule {
    pub snapshot: ScheduleSnapshot,
    /// Entries the load-time normalization moved
    pub repaired: usize,
}

pub(crate) async fn load_schedule(db: &Database) -> Result<LoadedSchedule, DbError> {
    let mut snapshot = db.snapshot().await?;
    let mut repaired = 0;

    if snapshot.settings.cascade_changes {
        let outcome = normalize_all_lanes(&snapshot);
        for (track_id, err) in &outcome.skipped {
            warn!(track_id = %track_id, error = %err, "Lane left unpacked on load");
        }
        if !outcome.batch.is_empty() {
            repaired = db.entries().apply_batch(&outcome.batch).await?;
            outcome.batch.apply_to(&mut snapshot.entries);
            debug!(repaired, "Normalized lanes on load");
        }
    }

    Ok(LoadedSchedule { snapshot, repaired })
}

/// Persist a planned batch; returns the number of entries written
pub(crate) async fn commit(db: &Database, batch: &UpdateBatch) -> Result<usize, DbError> {
    db.entries().apply_batch(batch).await
}
