//! Session state
//!
//! A `Session` is either logged out or holds the working copy of exactly one
//! user's record. All mutations go through it and fail with a precondition
//! error while nobody is logged in. Persisting is the caller's job: `end`
//! hands back the final record.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Expense, FinancialRecord, IncomeSource, Investment, Money, SessionId};

/// The logged-in half of a session
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: SessionId,
    pub username: String,
    pub started_at: DateTime<Utc>,
    pub record: FinancialRecord,
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(ActiveSession),
}

/// In-memory session for the interactive shell
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

fn invalid(e: impl std::fmt::Display) -> FinanceError {
    FinanceError::Validation(e.to_string())
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session for `username` with its stored record
    ///
    /// Fails if a session is already active; log out first.
    pub fn start(&mut self, username: &str, record: FinancialRecord) -> FinanceResult<SessionId> {
        if let SessionState::LoggedIn(active) = &self.state {
            return Err(FinanceError::Precondition(format!(
                "'{}' is already logged in",
                active.username
            )));
        }

        let id = SessionId::new();
        self.state = SessionState::LoggedIn(ActiveSession {
            id,
            username: username.to_string(),
            started_at: Utc::now(),
            record,
        });
        debug!(session = %id, username, "session started");
        Ok(id)
    }

    /// End the session and return the final record
    pub fn end(&mut self) -> FinanceResult<FinancialRecord> {
        match std::mem::take(&mut self.state) {
            SessionState::LoggedIn(active) => {
                debug!(session = %active.id, username = %active.username, "session ended");
                Ok(active.record)
            }
            SessionState::LoggedOut => Err(FinanceError::no_active_session()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    pub fn current_user(&self) -> Option<&str> {
        self.active().map(|a| a.username.as_str())
    }

    pub fn id(&self) -> Option<SessionId> {
        self.active().map(|a| a.id)
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::LoggedIn(active) => Some(active),
            SessionState::LoggedOut => None,
        }
    }

    /// The working record, or a precondition error when logged out
    pub fn record(&self) -> FinanceResult<&FinancialRecord> {
        self.active()
            .map(|a| &a.record)
            .ok_or_else(FinanceError::no_active_session)
    }

    fn record_mut(&mut self) -> FinanceResult<&mut FinancialRecord> {
        match &mut self.state {
            SessionState::LoggedIn(active) => Ok(&mut active.record),
            SessionState::LoggedOut => Err(FinanceError::no_active_session()),
        }
    }

    pub fn budget(&self) -> FinanceResult<Money> {
        Ok(self.record()?.budget)
    }

    pub fn expenses(&self) -> FinanceResult<&[Expense]> {
        Ok(&self.record()?.expenses)
    }

    pub fn investments(&self) -> FinanceResult<&[Investment]> {
        Ok(&self.record()?.investments)
    }

    pub fn income_sources(&self) -> FinanceResult<&[IncomeSource]> {
        Ok(&self.record()?.income_sources)
    }

    pub fn categories(&self) -> FinanceResult<&[String]> {
        Ok(&self.record()?.categories)
    }

    pub fn current_savings(&self) -> FinanceResult<Money> {
        Ok(self.record()?.current_savings)
    }

    pub fn add_expense(&mut self, category: &str, amount: Money) -> FinanceResult<()> {
        self.record_mut()?.add_expense(category, amount).map_err(invalid)
    }

    pub fn add_investment(&mut self, kind: &str, amount: Money) -> FinanceResult<()> {
        self.record_mut()?.add_investment(kind, amount).map_err(invalid)
    }

    pub fn add_income(&mut self, source: &str, amount: Money) -> FinanceResult<()> {
        self.record_mut()?.add_income(source, amount).map_err(invalid)
    }

    pub fn set_budget(&mut self, amount: Money) -> FinanceResult<()> {
        self.record_mut()?.set_budget(amount).map_err(invalid)
    }

    pub fn set_current_savings(&mut self, amount: Money) -> FinanceResult<()> {
        self.record_mut()?.set_current_savings(amount).map_err(invalid)
    }

    pub fn add_category(&mut self, name: &str) -> FinanceResult<()> {
        self.record_mut()?.add_category(name).map_err(invalid)
    }
}
