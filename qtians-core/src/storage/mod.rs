//! Local durable storage.
//!
//! The client persists exactly two things between runs, each in its own JSON
//! file under the data directory:
//! - `history.json`: the cached record list (newest first, at most 50)
//! - `profile.json`: the last submitter's name, chapel and village
//!
//! The cache is a fallback for when the spreadsheet is unreachable, never a
//! source of truth.

mod local;
mod slot;

pub use local::{LocalStore, StorageError};
pub use slot::Slot;
