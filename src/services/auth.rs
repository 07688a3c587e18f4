//! Authentication service
//!
//! Ties the credential store to a session: registration, login and logout,
//! with an audit entry for each outcome.

use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::error::{FinanceError, FinanceResult};
use crate::models::SessionId;
use crate::session::Session;
use crate::storage::CredentialStore;

/// Result of a logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub username: String,
    /// False when the user vanished from the store during the session
    pub persisted: bool,
}

/// Service for account and session lifecycle
pub struct AuthService<'a> {
    store: &'a CredentialStore,
    audit: &'a AuditLogger,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a CredentialStore, audit: &'a AuditLogger) -> Self {
        Self { store, audit }
    }

    /// Audit write failures are logged, never returned
    fn record_audit(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            warn!(error = %e, operation = %entry.operation, "failed to write audit entry");
        }
    }

    /// Register a new user with an empty record
    pub fn register(&self, username: &str, password: &str) -> FinanceResult<()> {
        if !self.store.register(username, password)? {
            return Err(FinanceError::DuplicateUsername(username.to_string()));
        }

        self.record_audit(&AuditEntry::new(Operation::Register, EntityType::User, username));
        Ok(())
    }

    /// Verify credentials and load the user's record into the session
    ///
    /// Unknown users and wrong passwords fail the same way. A legacy bcrypt
    /// hash is replaced with Argon2 once the password has been verified.
    pub fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> FinanceResult<SessionId> {
        if let Some(current) = session.current_user() {
            return Err(FinanceError::Precondition(format!(
                "'{}' is already logged in; log out first",
                current
            )));
        }

        if !self.store.authenticate(username, password)? {
            warn!(username, "login rejected");
            self.record_audit(&AuditEntry::new(
                Operation::LoginRejected,
                EntityType::User,
                username,
            ));
            return Err(FinanceError::InvalidCredentials);
        }

        let record = self
            .store
            .fetch_record(username)?
            .ok_or(FinanceError::InvalidCredentials)?;

        self.store.upgrade_legacy_hash(username, password)?;

        let id = session.start(username, record)?;
        info!(username, session = %id, "logged in");
        self.record_audit(
            &AuditEntry::new(Operation::Login, EntityType::User, username).with_session(id),
        );
        Ok(id)
    }

    /// Write the session's record back to the store, then end the session
    ///
    /// If the write fails the session stays active with its record intact,
    /// so the logout can be retried.
    pub fn logout(&self, session: &mut Session) -> FinanceResult<LogoutOutcome> {
        let (username, id, record) = match session.active() {
            Some(active) => (active.username.clone(), active.id, active.record.clone()),
            None => return Err(FinanceError::no_active_session()),
        };

        let persisted = self.store.persist_record(&username, &record)?;
        session.end()?;
        if persisted {
            info!(username = %username, session = %id, "logged out");
        } else {
            warn!(username = %username, session = %id, "user no longer exists, record discarded");
        }

        let mut entry =
            AuditEntry::new(Operation::Logout, EntityType::User, &username).with_session(id);
        if !persisted {
            entry = entry.with_detail("record not persisted: user no longer exists");
        }
        self.record_audit(&entry);

        Ok(LogoutOutcome {
            username,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashingParams;
    use crate::models::{FinancialRecord, Money};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        store: CredentialStore,
        audit: AuditLogger,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::new(
            temp.path().join("users.json"),
            HashingParams::with_values(256, 1, 1),
        );
        let audit = AuditLogger::new(temp.path().join("audit.log"));
        Fixture {
            _temp: temp,
            store,
            audit,
        }
    }

    #[test]
    fn test_alice_scenario() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();

        auth.register("alice", "pw123").unwrap();
        assert!(matches!(
            auth.register("alice", "x"),
            Err(FinanceError::DuplicateUsername(_))
        ));

        auth.login(&mut session, "alice", "pw123").unwrap();
        session.add_expense("Food", Money::from_cents(4200)).unwrap();
        let expected = session.record().unwrap().clone();

        let outcome = auth.logout(&mut session).unwrap();
        assert!(outcome.persisted);
        assert!(!session.is_active());

        auth.login(&mut session, "alice", "pw123").unwrap();
        assert_eq!(session.record().unwrap(), &expected);
        assert_eq!(session.expenses().unwrap()[0].category, "Food");
        assert_eq!(session.expenses().unwrap()[0].amount.cents(), 4200);
    }

    #[test]
    fn test_login_rejections_look_alike() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        auth.register("alice", "pw123").unwrap();

        let wrong_pw = auth.login(&mut session, "alice", "nope").unwrap_err();
        let no_user = auth.login(&mut session, "bob", "pw123").unwrap_err();
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
        assert!(matches!(wrong_pw, FinanceError::InvalidCredentials));
        assert!(!session.is_active());
    }

    #[test]
    fn test_double_login_rejected() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        auth.register("alice", "pw123").unwrap();
        auth.register("bob", "pw").unwrap();

        auth.login(&mut session, "alice", "pw123").unwrap();
        let err = auth.login(&mut session, "bob", "pw").unwrap_err();
        assert!(matches!(err, FinanceError::Precondition(_)));
        assert_eq!(session.current_user(), Some("alice"));
    }

    #[test]
    fn test_logout_without_login() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        assert!(matches!(
            auth.logout(&mut session),
            Err(FinanceError::Precondition(_))
        ));
    }

    #[test]
    fn test_failed_logout_keeps_session() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        auth.register("alice", "pw123").unwrap();
        auth.login(&mut session, "alice", "pw123").unwrap();
        session.add_expense("Food", Money::from_cents(4200)).unwrap();

        let good = fs::read(f.store.path()).unwrap();
        fs::write(f.store.path(), "garbage").unwrap();

        assert!(auth.logout(&mut session).unwrap_err().is_corrupt());
        assert!(session.is_active());
        assert_eq!(session.expenses().unwrap().len(), 1);

        fs::write(f.store.path(), good).unwrap();
        assert!(auth.logout(&mut session).unwrap().persisted);
        assert!(!session.is_active());

        let record = f.store.fetch_record("alice").unwrap().unwrap();
        assert_eq!(record.expenses[0].amount.cents(), 4200);
    }

    #[test]
    fn test_logout_after_user_removed() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        auth.register("alice", "pw123").unwrap();
        auth.login(&mut session, "alice", "pw123").unwrap();

        f.store.save(&Default::default()).unwrap();

        let outcome = auth.logout(&mut session).unwrap();
        assert!(!outcome.persisted);
        assert!(f.store.load().unwrap().is_empty());
    }

    #[test]
    fn test_audit_trail_has_no_secrets() {
        let f = fixture();
        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();

        auth.register("alice", "pw123secret").unwrap();
        let _ = auth.login(&mut session, "alice", "wrongsecret");
        auth.login(&mut session, "alice", "pw123secret").unwrap();
        auth.logout(&mut session).unwrap();

        let ops: Vec<_> = f.audit.read_all().unwrap().iter().map(|e| e.operation).collect();
        assert_eq!(
            ops,
            vec![
                Operation::Register,
                Operation::LoginRejected,
                Operation::Login,
                Operation::Logout
            ]
        );

        let log = fs::read_to_string(f.audit.path()).unwrap();
        assert!(!log.contains("secret"));
        assert!(!log.contains("argon2"));
    }

    #[test]
    fn test_login_upgrades_legacy_hash() {
        let f = fixture();
        let legacy = serde_json::json!({
            "alice": { "password": bcrypt::hash("pw123", 4).unwrap(), "budget": 50 }
        });
        fs::write(f.store.path(), legacy.to_string()).unwrap();

        let auth = AuthService::new(&f.store, &f.audit);
        let mut session = Session::new();
        auth.login(&mut session, "alice", "pw123").unwrap();

        assert_eq!(session.budget().unwrap().cents(), 5000);
        let users = f.store.load().unwrap();
        assert!(users["alice"].password_hash.starts_with("$argon2id$"));
        assert_eq!(users["alice"].record.budget.cents(), 5000);
        assert_eq!(users["alice"].record.categories, FinancialRecord::default().categories);
    }
}
