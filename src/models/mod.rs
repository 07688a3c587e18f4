//! Core data models for the finance tracker
//!
//! This module contains the data structures of a user's finances: money
//! amounts, line items, the per-user record and session identifiers.

pub mod entry;
pub mod ids;
pub mod money;
pub mod record;

pub use entry::{Expense, IncomeSource, Investment, LineItem, INVESTMENT_TYPES};
pub use ids::SessionId;
pub use money::{Money, MoneyParseError};
pub use record::{FinancialRecord, RecordValidationError, UserRecord, DEFAULT_CATEGORIES};
