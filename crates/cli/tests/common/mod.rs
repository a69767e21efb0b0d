//! Test infrastructure for integration tests
//!
//! Provides isolated database setup/teardown and command builder helpers.
//! Each test gets its own database instance to ensure no shared state.

use std::path::PathBuf;
use slate_cli::commands::{
    AddCommand, MoveCommand, RemoveCommand, ReorderCommand, ResizeCommand, RetimeCommand,
    TrackAddCommand,
};
use slate_db::Database;
use slate_timeline::{ScheduleEntry, ScheduleSettings};

/// Test context containing an isolated database and temp directory
pub struct TestContext {
    pub db: Database,
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with an isolated database.
    ///
    /// Each call creates a uniquely named temp directory using process ID,
    /// thread ID, and nanosecond timestamp to guarantee isolation.
    pub async fn new() -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "slate-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let db = Database::connect(&temp_dir).await.unwrap();
        db.init().await.unwrap();

        Self { db, temp_dir }
    }

    /// Context with two lanes (`photo`, `video`), one shared track (`all`)
    /// and the given settings.
    pub async fn with_tracks(settings: ScheduleSettings) -> Self {
        let ctx = Self::new().await;
        ctx.db.settings().save(&settings).await.unwrap();
        track_cmd("Photo", false).execute(&ctx.db).await.unwrap();
        track_cmd("Video", false).execute(&ctx.db).await.unwrap();
        let mut all = track_cmd("All crew", true);
        all.id = Some("all".to_string());
        all.execute(&ctx.db).await.unwrap();
        ctx
    }

    /// Insert an entry as stored, bypassing the append logic
    pub async fn seed(&self, entry: ScheduleEntry) {
        self.db.entries().create(&entry).await.unwrap();
    }

    /// Current start of an active entry
    pub async fn start_of(&self, id: &str) -> u32 {
        self.db.entries().get(id).await.unwrap().unwrap().start_time
    }

    pub async fn entry(&self, id: &str) -> ScheduleEntry {
        self.db.entries().get(id).await.unwrap().unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

/// Settings with cascade turned off, defaults otherwise
pub fn no_cascade() -> ScheduleSettings {
    ScheduleSettings {
        cascade_changes: false,
        ..ScheduleSettings::default()
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

pub fn track_cmd(name: &str, shared: bool) -> TrackAddCommand {
    TrackAddCommand {
        name: name.to_string(),
        id: None,
        color: String::new(),
        shared,
    }
}

pub fn add_cmd(title: &str, track: &str, duration: &str) -> AddCommand {
    AddCommand {
        title: title.to_string(),
        track: track.to_string(),
        duration: vec![duration.to_string()],
        custom: false,
        applies_to: vec![],
    }
}

pub fn banner_cmd(title: &str, track: &str, duration: &str, targets: &[&str]) -> AddCommand {
    AddCommand {
        custom: true,
        applies_to: targets.iter().map(|t| t.to_string()).collect(),
        ..add_cmd(title, track, duration)
    }
}

pub fn remove_cmd(entry: &str, hard: bool) -> RemoveCommand {
    RemoveCommand {
        entry: entry.to_string(),
        hard,
    }
}

pub fn resize_cmd(entry: &str, duration: &str) -> ResizeCommand {
    ResizeCommand {
        entry: entry.to_string(),
        duration: duration.split(' ').map(String::from).collect(),
    }
}

pub fn retime_cmd(entry: &str, time: u32) -> RetimeCommand {
    RetimeCommand {
        entry: entry.to_string(),
        time,
        snap: false,
    }
}

pub fn reorder_cmd(entry: &str, position: u32) -> ReorderCommand {
    ReorderCommand {
        entry: entry.to_string(),
        position,
    }
}

pub fn move_cmd(entry: &str, track: &str) -> MoveCommand {
    MoveCommand {
        entry: entry.to_string(),
        track: track.to_string(),
    }
}
