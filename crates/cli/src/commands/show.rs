//! Show command
//!
//! Read-only: prints the stored schedule as is, without the load-time
//! repair the structural commands run.

use crate::output::CallSheet;
use clap::Args;
use slate_db::{Database, DbError};

/// Print the call sheet
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ShowCommand {
    pub async fn execute(&self, db: &Database) -> Result<String, DbError> {
        let snapshot = db.snapshot().await?;
        let sheet = CallSheet::from_snapshot(&snapshot);
        if self.json {
            serde_json::to_string_pretty(&sheet)
                .map_err(|e| DbError::validation(format!("Failed to serialize call sheet: {}", e)))
        } else {
            Ok(sheet.to_string().trim_end().to_string())
        }
    }
}
