//! Audit trail for account and record activity
//!
//! Registrations, logins (accepted and rejected), logouts and every change to
//! a session's record are appended to `audit.log` as JSON lines. Passwords
//! and password hashes never appear in the log.
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::audit::{AuditEntry, AuditLogger, EntityType, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::new(Operation::Register, EntityType::User, "alice"))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
