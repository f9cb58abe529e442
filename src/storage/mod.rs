//! Ledger persistence
//!
//! JSON persistence with atomic writes and rotating backups, plus
//! export/import helpers for moving a ledger between data directories.

pub mod persistence;

pub use persistence::{
    load_from_file, save_to_file, Storage, StorageConfig, StorageError, StorageStats,
};
