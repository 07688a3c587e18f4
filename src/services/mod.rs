//! Service layer
//!
//! Business logic that spans the store, the session and the audit log.

pub mod auth;

pub use auth::{AuthService, LogoutOutcome};
