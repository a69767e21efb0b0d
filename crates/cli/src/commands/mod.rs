//! Command implementations for the Slate CLI
//!
//! Each command is a clap `Args` struct with an async `execute` method that
//! takes the open database and returns something printable.

pub mod add;
pub mod check;
pub mod day_start;
pub mod init;
pub mod move_entry;
pub mod normalize;
pub mod remove;
pub mod reorder;
pub mod resize;
pub mod retime;
mod schedule;
pub mod settings;
pub mod show;
pub mod track;

pub use add::AddCommand;
pub use check::CheckCommand;
pub use day_start::DayStartCommand;
pub use init::InitCommand;
pub use move_entry::MoveCommand;
pub use normalize::NormalizeCommand;
pub use remove::RemoveCommand;
pub use reorder::ReorderCommand;
pub use resize::ResizeCommand;
pub use retime::RetimeCommand;
pub use settings::SettingsCommand;
pub use show::ShowCommand;
pub use track::{TrackAddCommand, TrackCommand};

use clap::Subcommand;
use slate_db::{Database, DbError};
use slate_timeline::{TimeIncrement, TimelineError, parse_duration, parse_time_to_minutes};

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the schedule store and write its settings
    Init(InitCommand),

    /// Manage tracks
    #[command(subcommand)]
    Track(TrackCommand),

    /// Append an entry to a track
    Add(AddCommand),

    /// Remove an entry
    Remove(RemoveCommand),

    /// Change an entry's duration
    Resize(ResizeCommand),

    /// Change an entry's start time
    Retime(RetimeCommand),

    /// Move an entry to another position within its lane
    Reorder(ReorderCommand),

    /// Move an entry to another track
    #[command(name = "move")]
    Move(MoveCommand),

    /// Repack every lane so it has no gaps or overlaps
    Normalize(NormalizeCommand),

    /// Shift the whole day to a new start time
    DayStart(DayStartCommand),

    /// Show or update schedule settings
    Settings(SettingsCommand),

    /// Print the call sheet
    Show(ShowCommand),

    /// Report gaps, overlaps and other problems
    Check(CheckCommand),
}

impl Command {
    /// Run the command and render its result for the terminal.
    pub async fn execute(&self, db: &Database) -> Result<String, DbError> {
        match self {
            Command::Init(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Track(cmd) => cmd.execute(db).await,
            Command::Add(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Remove(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Resize(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Retime(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Reorder(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Move(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Normalize(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::DayStart(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Settings(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
            Command::Show(cmd) => cmd.execute(db).await,
            Command::Check(cmd) => cmd.execute(db).await.map(|r| r.to_string()),
        }
    }
}

/// clap value parser for `HH:MM`
pub(crate) fn parse_clock(s: &str) -> Result<u32, String> {
    parse_time_to_minutes(s).map_err(|e| e.to_string())
}

/// clap value parser for the editor increment
pub(crate) fn parse_increment(s: &str) -> Result<TimeIncrement, String> {
    let minutes: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid time increment '{}'. Valid values: 5, 15, 30", s))?;
    TimeIncrement::try_from(minutes)
}

/// Duration given as one or more words (`1h 30m` may arrive split in two).
pub(crate) fn duration_from_words(words: &[String]) -> Result<u32, TimelineError> {
    let text = words.join(" ");
    match parse_duration(&text) {
        Some(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(TimelineError::InvalidDuration { input: text }),
    }
}
