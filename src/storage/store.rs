//! Credential store
//!
//! Durable mapping from username to password hash plus financial record,
//! persisted as a single versioned JSON document.
//!
//! Every load-modify-save sequence runs under the store's mutex, so two
//! threads sharing one `CredentialStore` never lose each other's updates.
//! Separate processes pointed at the same file are not coordinated: the last
//! writer wins.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use tracing::{debug, info, warn};

use crate::backup::BackupManager;
use crate::config::{FinancePaths, Settings};
use crate::crypto::{hash_password, is_legacy_hash, verify_password, HashingParams};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{FinancialRecord, UserRecord};

use super::file_io::{read_json_value, write_json_atomic};
use super::schema::{migrate, StoreDocumentRef, UserMap};

/// Check a username before it is stored
///
/// Usernames are case-sensitive, non-empty and free of whitespace and
/// control characters.
pub fn validate_username(username: &str) -> FinanceResult<()> {
    if username.is_empty() {
        return Err(FinanceError::Validation("Username cannot be empty".into()));
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(FinanceError::Validation(
            "Username cannot contain spaces or control characters".into(),
        ));
    }
    Ok(())
}

/// Outcome of loading a store that may need recovery
#[derive(Debug)]
pub struct LoadOutcome {
    pub users: UserMap,
    /// Where the corrupt file was moved, if recovery happened
    pub quarantined: Option<PathBuf>,
}

/// File-backed store of all registered users
pub struct CredentialStore {
    path: PathBuf,
    hashing: HashingParams,
    write_lock: Mutex<()>,
    /// Verified against for unknown usernames so they cost a hash too
    dummy_hash: OnceLock<String>,
}

impl CredentialStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf, hashing: HashingParams) -> Self {
        Self {
            path,
            hashing,
            write_lock: Mutex::new(()),
            dummy_hash: OnceLock::new(),
        }
    }

    /// Create the store at the standard location with configured hashing costs
    pub fn open(paths: &FinancePaths, settings: &Settings) -> Self {
        Self::new(paths.users_file(), settings.hashing)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> FinanceResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire store lock: {}", e)))
    }

    /// Read every user from disk
    ///
    /// A missing file is an empty store. Older schema versions are migrated in
    /// memory; the file is rewritten in the new layout on the next save.
    pub fn load(&self) -> FinanceResult<UserMap> {
        match read_json_value(&self.path)? {
            None => Ok(UserMap::new()),
            Some(value) => Ok(migrate(value)?.users),
        }
    }

    /// Overwrite the store file atomically
    pub fn save(&self, users: &UserMap) -> FinanceResult<()> {
        write_json_atomic(&self.path, &StoreDocumentRef::new(users))?;
        debug!(path = %self.path.display(), users = users.len(), "saved user store");
        Ok(())
    }

    /// Load, moving an undecodable file into the backup directory first
    ///
    /// After quarantine the store starts empty. Errors other than corruption
    /// are returned unchanged.
    pub fn load_or_recover(&self, backups: &BackupManager) -> FinanceResult<LoadOutcome> {
        let _guard = self.lock()?;
        match self.load() {
            Ok(users) => Ok(LoadOutcome {
                users,
                quarantined: None,
            }),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "user store is corrupt, moving it aside");
                let moved = backups.quarantine(&self.path)?;
                Ok(LoadOutcome {
                    users: UserMap::new(),
                    quarantined: Some(moved),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Register a new user
    ///
    /// Returns `Ok(false)` without touching the file if the username is taken.
    pub fn register(&self, username: &str, password: &str) -> FinanceResult<bool> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(FinanceError::Validation("Password cannot be empty".into()));
        }

        let _guard = self.lock()?;
        let mut users = self.load()?;
        if users.contains_key(username) {
            debug!(username, "registration rejected, username taken");
            return Ok(false);
        }

        let password_hash = hash_password(password, &self.hashing)?;
        users.insert(username.to_string(), UserRecord::new(password_hash));
        self.save(&users)?;

        info!(username, "registered user");
        Ok(true)
    }

    fn dummy_hash(&self) -> FinanceResult<&str> {
        if self.dummy_hash.get().is_none() {
            let hash = hash_password("not-a-real-password", &self.hashing)?;
            let _ = self.dummy_hash.set(hash);
        }
        Ok(self.dummy_hash.get().map(String::as_str).unwrap_or_default())
    }

    /// Check a username/password pair
    ///
    /// Unknown usernames still run one Argon2 verification, so timing does
    /// not reveal which names are registered.
    pub fn authenticate(&self, username: &str, password: &str) -> FinanceResult<bool> {
        let users = self.load()?;
        match users.get(username) {
            Some(user) => verify_password(password, &user.password_hash),
            None => {
                verify_password(password, self.dummy_hash()?)?;
                Ok(false)
            }
        }
    }

    /// The password-free record of one user
    pub fn fetch_record(&self, username: &str) -> FinanceResult<Option<FinancialRecord>> {
        Ok(self.load()?.remove(username).map(|u| u.record))
    }

    /// Overwrite a user's record, keeping the stored password hash
    ///
    /// Returns `Ok(false)` if the user no longer exists; records are never
    /// created here.
    pub fn persist_record(&self, username: &str, record: &FinancialRecord) -> FinanceResult<bool> {
        let _guard = self.lock()?;
        let mut users = self.load()?;

        let Some(user) = users.get_mut(username) else {
            warn!(username, "cannot persist record for unknown user");
            return Ok(false);
        };
        user.record = record.clone();

        self.save(&users)?;
        debug!(username, "persisted user record");
        Ok(true)
    }

    /// Replace a legacy bcrypt hash with an Argon2 one
    ///
    /// Only call after `authenticate` succeeded with this password. Returns
    /// `Ok(true)` if the hash was upgraded.
    pub fn upgrade_legacy_hash(&self, username: &str, password: &str) -> FinanceResult<bool> {
        let _guard = self.lock()?;
        let mut users = self.load()?;

        let Some(user) = users.get_mut(username) else {
            return Ok(false);
        };
        if !is_legacy_hash(&user.password_hash) {
            return Ok(false);
        }

        user.password_hash = hash_password(password, &self.hashing)?;
        self.save(&users)?;
        info!(username, "upgraded legacy password hash");
        Ok(true)
    }

    /// All registered usernames in order
    pub fn usernames(&self) -> FinanceResult<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }
}
