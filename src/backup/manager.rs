//! Backup manager for the user store
//!
//! Handles rolling backups with a count-based retention policy, and moves
//! corrupt store files out of the way.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::paths::FinancePaths;
use crate::config::settings::BackupRetention;
use crate::error::{FinanceError, FinanceResult};
use crate::storage::read_json_value;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Archive format version
    pub schema_version: u32,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// The store document exactly as it was on disk
    pub store: serde_json::Value,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: FinancePaths,
    retention: BackupRetention,
}

fn timestamp_slug(now: DateTime<Utc>) -> String {
    format!(
        "{}-{:03}",
        now.format("%Y%m%d-%H%M%S"),
        now.timestamp_subsec_millis()
    )
}

impl BackupManager {
    pub fn new(paths: FinancePaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    fn ensure_dir(&self) -> FinanceResult<()> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| FinanceError::Io(format!("Failed to create backup directory: {}", e)))
    }

    /// Create a backup of the user store
    ///
    /// Returns `Ok(None)` when there is no store file yet. A store that isn't
    /// valid JSON is not backed up.
    pub fn create_backup(&self) -> FinanceResult<Option<PathBuf>> {
        let Some(store) = read_json_value(self.paths.users_file())? else {
            return Ok(None);
        };
        self.ensure_dir()?;

        let now = Utc::now();
        let filename = format!("backup-{}.json", timestamp_slug(now));
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: 1,
            created_at: now,
            store,
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| FinanceError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| FinanceError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(path = %backup_path.display(), "created backup");
        Ok(Some(backup_path))
    }

    /// Move an unreadable file into the backup directory
    ///
    /// The file keeps its bytes untouched as `corrupt-<timestamp>.json` so it
    /// can be inspected or repaired by hand.
    pub fn quarantine(&self, path: &Path) -> FinanceResult<PathBuf> {
        self.ensure_dir()?;
        let target = self
            .backup_dir
            .join(format!("corrupt-{}.json", timestamp_slug(Utc::now())));

        if fs::rename(path, &target).is_err() {
            // rename fails across filesystems
            fs::copy(path, &target)
                .map_err(|e| FinanceError::Io(format!("Failed to copy corrupt file: {}", e)))?;
            fs::remove_file(path)
                .map_err(|e| FinanceError::Io(format!("Failed to remove corrupt file: {}", e)))?;
        }

        info!(from = %path.display(), to = %target.display(), "quarantined corrupt file");
        Ok(target)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> FinanceResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| FinanceError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| FinanceError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Delete backups beyond the retention count
    pub fn enforce_retention(&self) -> FinanceResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep_count as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| FinanceError::Io(format!("Failed to delete old backup: {}", e)))?;
            debug!(path = %backup.path.display(), "deleted old backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> FinanceResult<Option<PathBuf>> {
        let created = self.create_backup()?;
        self.enforce_retention()?;
        Ok(created)
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> FinanceResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }
}

/// Parse backup info from a `backup-YYYYMMDD-HHMMSS-mmm.json` file
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse a backup timestamp from the filename date part
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    // YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().unwrap_or(0)
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}
