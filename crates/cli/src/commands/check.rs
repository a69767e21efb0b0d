//! Check command

use clap::Args;
use slate_db::{Database, DbError};
use slate_timeline::{ValidationReport, validate_snapshot};

/// Report gaps, overlaps and other problems
#[derive(Debug, Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(&self, db: &Database) -> Result<ValidationReport, DbError> {
        let snapshot = db.snapshot().await?;
        Ok(validate_snapshot(&snapshot))
    }
}
