//! Audit entry data structures
//!
//! Defines the structure of audit log entries: what happened, to which part
//! of whose record, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SessionId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// A new user was registered
    Register,
    /// A login succeeded
    Login,
    /// A login attempt was refused
    LoginRejected,
    /// A session ended and its record was persisted
    Logout,
    /// A field of the working record changed
    Update,
    /// Data left the store as an export file
    Export,
    /// The store was replaced from a backup
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Register => write!(f, "REGISTER"),
            Operation::Login => write!(f, "LOGIN"),
            Operation::LoginRejected => write!(f, "LOGIN_REJECTED"),
            Operation::Logout => write!(f, "LOGOUT"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Export => write!(f, "EXPORT"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// Parts of the system an audit entry can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Budget,
    Expense,
    Investment,
    IncomeSource,
    Category,
    Savings,
    Store,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::User => write!(f, "User"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Investment => write!(f, "Investment"),
            EntityType::IncomeSource => write!(f, "IncomeSource"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Savings => write!(f, "Savings"),
            EntityType::Store => write!(f, "Store"),
        }
    }
}

/// A single audit log entry
///
/// Entries never carry passwords or password hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Username the operation acted for
    pub username: String,

    /// Session the operation ran in, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    /// JSON value before an update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// JSON value after an update or of an appended item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Free-form note (export target, backup file, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Entry with no payload
    pub fn new(operation: Operation, entity_type: EntityType, username: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            username: username.into(),
            session_id: None,
            before: None,
            after: None,
            detail: None,
        }
    }

    /// Entry for a changed or appended field of a session's record
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        username: impl Into<String>,
        session_id: SessionId,
        before: Option<&T>,
        after: &T,
    ) -> Self {
        Self {
            session_id: Some(session_id),
            before: before.and_then(|b| serde_json::to_value(b).ok()),
            after: serde_json::to_value(after).ok(),
            ..Self::new(Operation::Update, entity_type, username)
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.username
        );

        if let Some(id) = &self.session_id {
            output.push_str(&format!(" ({})", id));
        }

        match (&self.before, &self.after) {
            (Some(before), Some(after)) => output.push_str(&format!("\n  {} -> {}", before, after)),
            (None, Some(after)) => output.push_str(&format!("\n  + {}", after)),
            _ => {}
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!("\n  {}", detail));
        }

        output
    }
}
