//! One-shot account commands

use std::io::BufRead;

use crate::audit::AuditLogger;
use crate::crypto::SecureString;
use crate::error::{FinanceError, FinanceResult};
use crate::services::AuthService;
use crate::storage::CredentialStore;

/// Read the password from stdin's first line, or prompt on the terminal
pub fn read_password<R: BufRead>(from_stdin: bool, mut stdin: R) -> FinanceResult<SecureString> {
    if from_stdin {
        let mut line = String::new();
        stdin.read_line(&mut line)?;
        let password = SecureString::from(line.trim_end_matches(['\r', '\n']));
        line.clear();
        return Ok(password);
    }

    let first = SecureString::from(
        rpassword::prompt_password("Password: ")
            .map_err(|e| FinanceError::Io(format!("Failed to read password: {}", e)))?,
    );
    let confirm = SecureString::from(
        rpassword::prompt_password("Confirm password: ")
            .map_err(|e| FinanceError::Io(format!("Failed to read password: {}", e)))?,
    );
    if first.as_str() != confirm.as_str() {
        return Err(FinanceError::Validation("Passwords do not match".into()));
    }
    Ok(first)
}

/// Handle `finance register <username>`
pub fn handle_register_command(
    store: &CredentialStore,
    audit: &AuditLogger,
    username: &str,
    password: &SecureString,
) -> FinanceResult<()> {
    AuthService::new(store, audit).register(username, password)?;
    println!("Registered '{}'.", username);
    Ok(())
}

/// Handle `finance users`: registered usernames, one per line
pub fn handle_users_command(store: &CredentialStore) -> FinanceResult<()> {
    let usernames = store.usernames()?;
    if usernames.is_empty() {
        println!("No users registered.");
    }
    for username in usernames {
        println!("{}", username);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashingParams;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_password_from_stdin() {
        let password = read_password(true, Cursor::new("pw123\nignored\n")).unwrap();
        assert_eq!(password.as_str(), "pw123");

        let password = read_password(true, Cursor::new("")).unwrap();
        assert!(password.is_empty());
    }

    #[test]
    fn test_register_command() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::new(
            temp.path().join("users.json"),
            HashingParams::with_values(256, 1, 1),
        );
        let audit = AuditLogger::new(temp.path().join("audit.log"));

        handle_register_command(&store, &audit, "alice", &"pw123".into()).unwrap();
        assert!(store.authenticate("alice", "pw123").unwrap());
        assert!(matches!(
            handle_register_command(&store, &audit, "alice", &"x".into()),
            Err(FinanceError::DuplicateUsername(_))
        ));
        assert!(handle_register_command(&store, &audit, "bob", &"".into())
            .unwrap_err()
            .is_validation());
    }
}
