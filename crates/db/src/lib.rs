//! Schedule store for Slate
//!
//! Provides SurrealDB connection management with the embedded SurrealKV
//! backend, schema initialization, and repositories for tracks, entries
//! and settings. `Database::snapshot` assembles the read-only view the
//! timeline engine works on.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::{DbError, DbResult};
pub use repository::{DeleteMode, EntryRepository, SettingsRepository, TrackRepository};

use slate_timeline::ScheduleSnapshot;
use std::path::{Path, PathBuf};
use std::process::Command;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, SurrealKv};
use tracing::debug;

/// Default database path relative to project root or current working directory
pub const DEFAULT_DB_PATH: &str = ".slate/data";

/// Namespace and database every schedule lives in
const NAMESPACE: &str = "slate";
const DATABASE: &str = "main";

/// Database wrapper providing connection management for SurrealDB
pub struct Database {
    client: Surreal<Db>,
    path: PathBuf,
}

impl Database {
    /// Connect to a SurrealDB database at the specified path.
    ///
    /// Creates the database directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DbError::CreateDirectory` if directory creation fails.
    /// Returns `DbError::Connection` if database connection fails.
    pub async fn connect(path: &Path) -> DbResult<Self> {
        let path = Self::prepare_path(path)?;

        let client =
            Surreal::new::<SurrealKv>(path.clone())
                .await
                .map_err(|e| DbError::Connection {
                    path: path.clone(),
                    source: Box::new(e),
                })?;

        debug!("Connected to schedule store at {}", path.display());
        Ok(Self { client, path })
    }

    /// Select the namespace and define the schema.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if schema initialization fails.
    pub async fn init(&self) -> DbResult<()> {
        self.client
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| DbError::Schema(Box::new(e)))?;

        schema::init_schema(&self.client).await?;

        Ok(())
    }

    /// Get a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Db> {
        &self.client
    }

    /// Get the path where the database is stored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tracks(&self) -> TrackRepository<'_> {
        TrackRepository::new(&self.client)
    }

    pub fn entries(&self) -> EntryRepository<'_> {
        EntryRepository::new(&self.client)
    }

    pub fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(&self.client)
    }

    /// Load tracks, active entries and settings as one snapshot.
    ///
    /// Entries come back in insertion order.
    pub async fn snapshot(&self) -> DbResult<ScheduleSnapshot> {
        let tracks = self.tracks().list().await?;
        let entries = self.entries().list_active().await?;
        let settings = self.settings().get().await?;
        debug!(
            "Snapshot: {} tracks, {} entries",
            tracks.len(),
            entries.len()
        );
        Ok(ScheduleSnapshot::new(tracks, entries, settings))
    }

    /// Get the default database path based on project root.
    ///
    /// Uses `git rev-parse --show-toplevel` to find the project root and
    /// returns `<project_root>/.slate/data`. Outside a git repository this
    /// falls back to `.slate/data` relative to the current working directory.
    pub fn default_path() -> DbResult<PathBuf> {
        let base_path = find_project_root().unwrap_or_else(|| PathBuf::from("."));
        Ok(base_path.join(DEFAULT_DB_PATH))
    }

    /// Prepare the database path by validating and creating directories.
    fn prepare_path(path: &Path) -> DbResult<PathBuf> {
        let path = path.to_path_buf();

        if path.exists() && !path.is_dir() {
            return Err(DbError::InvalidPath {
                path,
                reason: "Path exists and is not a directory".to_string(),
            });
        }

        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|e| DbError::CreateDirectory {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(path)
    }
}

// Ensure Database is Send + Sync for async compatibility
static_assertions::assert_impl_all!(Database: Send, Sync);

/// Find the project root by running `git rev-parse --show-toplevel`.
///
/// Returns `None` if not in a git repository or the command fails.
pub fn find_project_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;

    if output.status.success() {
        let path_str = String::from_utf8(output.stdout).ok()?;
        Some(PathBuf::from(path_str.trim()))
    } else {
        None
    }
}
