//! Password hashing using Argon2id
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the salt and cost parameters travel with the hash and verification
//! needs nothing else. Stores migrated from the legacy layout may still hold
//! bcrypt hashes (`$2b$...`); those verify through bcrypt and are replaced with
//! Argon2 on the next successful login.

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};

/// Cost parameters for new password hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism degree (default: 1)
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingParams {
    /// Create params with specific values
    pub fn with_values(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    fn hasher(&self) -> FinanceResult<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| FinanceError::Hashing(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str, params: &HashingParams) -> FinanceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = params
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| FinanceError::Hashing(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Whether a stored hash predates Argon2 and should be replaced
pub fn is_legacy_hash(stored_hash: &str) -> bool {
    stored_hash.starts_with("$2")
}

/// Check a password against a stored hash string
///
/// Returns `Ok(false)` on mismatch. Both the Argon2 and bcrypt paths compare
/// digests in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> FinanceResult<bool> {
    if is_legacy_hash(stored_hash) {
        return bcrypt::verify(password, stored_hash)
            .map_err(|e| FinanceError::Hashing(format!("Legacy hash verification failed: {}", e)));
    }

    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| FinanceError::Hashing(format!("Malformed password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(FinanceError::Hashing(format!("Password verification failed: {}", e))),
    }
}
