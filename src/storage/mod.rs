//! Storage layer for the finance tracker
//!
//! Provides the credential store: one versioned JSON document holding every
//! user, written atomically.

pub mod file_io;
pub mod schema;
pub mod store;

pub use file_io::{read_json_value, write_json_atomic};
pub use schema::{migrate, StoreDocument, UserMap, CURRENT_SCHEMA_VERSION};
pub use store::{validate_username, CredentialStore, LoadOutcome};
