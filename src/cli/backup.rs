//! Backup CLI commands
//!
//! Implements `finance backup ...` for the user store.

use clap::Subcommand;
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::FinancePaths;
use crate::config::settings::Settings;
use crate::display::format_backup_list;
use crate::error::{FinanceError, FinanceResult};

/// Audit username for actions taken outside a session
const CLI_ACTOR: &str = "cli";

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup of the user store
    Create,

    /// List all available backups
    List,

    /// Replace the user store with a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Delete backups beyond the retention count
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &FinancePaths,
    settings: &Settings,
    audit: &AuditLogger,
    cmd: BackupCommands,
) -> FinanceResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => match manager.create_backup_with_retention()? {
            Some(path) => {
                println!("Backup created: {}", path.display());
            }
            None => {
                println!("Nothing to back up: no users registered yet.");
            }
        },

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            println!("{}", format_backup_list(&backups));
            if !backups.is_empty() {
                println!();
                println!(
                    "Total: {} backup(s), keeping {}",
                    backups.len(),
                    settings.backup_retention.keep_count
                );
            }
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let restore_manager = RestoreManager::new(paths.clone());
            let archive = restore_manager.read_archive(&backup_path)?;

            println!("Backup: {}", backup_path.display());
            println!(
                "Created: {}",
                archive.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );

            if !force {
                println!();
                println!("WARNING: This will overwrite ALL registered users and records!");
                println!("To proceed, run again with --force:");
                println!("  finance backup restore {} --force", backup);
                return Ok(());
            }

            if let Some(pre_restore) = manager.create_backup()? {
                println!("Current store saved to {}", pre_restore.display());
            }

            let result = restore_manager.restore_from_file(&backup_path)?;
            audit.log(
                &AuditEntry::new(Operation::Restore, EntityType::Store, CLI_ACTOR)
                    .with_detail(backup_path.display().to_string()),
            )?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> FinanceResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .list_backups()?
            .into_iter()
            .next()
            .map(|b| b.path)
            .ok_or_else(|| FinanceError::backup_not_found("latest"));
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    if let Some(info) = manager.get_backup(backup)? {
        return Ok(info.path);
    }

    let with_ext = manager.backup_dir().join(format!("{}.json", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(FinanceError::backup_not_found(backup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::BackupRetention;
    use crate::storage::write_json_atomic;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_backup_path() {
        let temp = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let manager = BackupManager::new(paths.clone(), BackupRetention::default());

        assert!(resolve_backup_path(&manager, "latest")
            .unwrap_err()
            .is_not_found());

        write_json_atomic(paths.users_file(), &json!({"schema_version": 1, "users": {}})).unwrap();
        let created = manager.create_backup().unwrap().unwrap();
        let filename = created.file_name().unwrap().to_string_lossy().to_string();
        let stem = filename.trim_end_matches(".json").to_string();

        assert_eq!(resolve_backup_path(&manager, "latest").unwrap(), created);
        assert_eq!(resolve_backup_path(&manager, &filename).unwrap(), created);
        assert_eq!(resolve_backup_path(&manager, &stem).unwrap(), created);
        assert!(resolve_backup_path(&manager, "nope").is_err());
    }
}
