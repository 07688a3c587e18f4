//! Backup restoration
//!
//! Restores the user store from a backup archive after checking that the
//! archived document decodes.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::paths::FinancePaths;
use crate::error::{FinanceError, FinanceResult};
use crate::storage::{migrate, write_json_atomic};

use super::manager::BackupArchive;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: FinancePaths,
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// When the restored backup was taken
    pub backup_date: DateTime<Utc>,
    /// Number of users in the restored store
    pub user_count: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Restored {} user(s) from backup taken {}",
            self.user_count,
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl RestoreManager {
    pub fn new(paths: FinancePaths) -> Self {
        Self { paths }
    }

    /// Read and decode a backup archive without touching the live store
    pub fn read_archive(&self, backup_path: &Path) -> FinanceResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| FinanceError::Io(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinanceError::Json(format!("Failed to parse backup file: {}", e)))
    }

    /// Replace the user store with the contents of a backup
    ///
    /// The archived document is migrated to the current schema first, so an
    /// unreadable backup never overwrites a good store. Callers should take a
    /// fresh backup before restoring.
    pub fn restore_from_file(&self, backup_path: &Path) -> FinanceResult<RestoreResult> {
        let archive = self.read_archive(backup_path)?;
        let document = migrate(archive.store)?;

        self.paths.ensure_directories()?;
        write_json_atomic(self.paths.users_file(), &document)?;

        info!(path = %backup_path.display(), users = document.users.len(), "restored user store");
        Ok(RestoreResult {
            backup_date: archive.created_at,
            user_count: document.users.len(),
        })
    }
}
