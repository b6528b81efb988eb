//! File system helpers for rotation.

pub mod listing;

pub use listing::{list_entries, move_entry, remove_entry, EntryInfo};
