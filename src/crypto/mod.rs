//! Cryptographic functions for the finance tracker
//!
//! Provides Argon2id password hashing with timing-safe verification and a
//! zeroizing string type for passwords held in memory.

pub mod password;
pub mod secure_memory;

pub use password::{hash_password, is_legacy_hash, verify_password, HashingParams};
pub use secure_memory::SecureString;
