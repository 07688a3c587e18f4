//! User settings for the finance tracker
//!
//! Manages password hashing costs, backup retention, audit logging and
//! display preferences.

use serde::{Deserialize, Serialize};

use super::paths::FinancePaths;
use crate::crypto::password::HashingParams;
use crate::error::FinanceError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of store backups to keep
    pub keep_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep_count: 10 }
    }
}

/// User settings for the finance tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Argon2 cost parameters used for new password hashes
    #[serde(default)]
    pub hashing: HashingParams,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether register/login/logout events go to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Move a corrupt user store aside and start empty instead of failing
    #[serde(default = "default_true")]
    pub recover_corrupt_store: bool,

    /// Default log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            hashing: HashingParams::default(),
            backup_retention: BackupRetention::default(),
            currency_symbol: default_currency(),
            audit_enabled: true,
            recover_corrupt_store: true,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FinanceError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinanceError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FinanceError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            FinanceError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Parse the configured log level, falling back to WARN
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backup_retention.keep_count, 10);
        assert!(settings.audit_enabled);
        assert!(settings.recover_corrupt_store);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.audit_enabled = false;
        settings.hashing = HashingParams::with_values(1024, 1, 1);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.audit_enabled);
        assert_eq!(loaded.hashing.memory_cost, 1024);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.schema_version, 1);
        assert!(settings.recover_corrupt_store);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let mut settings = Settings::default();
        settings.log_level = "chatty".into();
        assert_eq!(settings.tracing_level(), tracing::Level::WARN);

        settings.log_level = "debug".into();
        assert_eq!(settings.tracing_level(), tracing::Level::DEBUG);
    }
}
