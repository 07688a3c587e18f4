//! Backup system for the user store
//!
//! - `BackupManager`: creates rolling backups, enforces retention and moves
//!   corrupt store files aside
//! - `RestoreManager`: validates and restores backups
//!
//! # Backup Format
//!
//! Backups are JSON files named `backup-YYYYMMDD-HHMMSS-mmm.json` holding:
//! - `schema_version`: archive format version
//! - `created_at`: timestamp when the backup was created
//! - `store`: the user store document verbatim
//!
//! Corrupt store files are kept next to them as `corrupt-<timestamp>.json`.

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult};
