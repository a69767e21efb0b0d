//! Repository modules for database operations
//!
//! One repository per table, each borrowing the shared client.

mod entry;
mod settings;
mod track;

pub use entry::{DeleteMode, EntryRepository};
pub use settings::SettingsRepository;
pub use track::TrackRepository;
