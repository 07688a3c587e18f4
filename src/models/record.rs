//! Per-user financial record
//!
//! `FinancialRecord` is everything a user owns except the password hash. It is
//! what a session works on and what exports see. `UserRecord` pairs it with the
//! hash for storage.

use serde::{Deserialize, Serialize};

use super::entry::{Expense, IncomeSource, Investment};
use super::money::Money;

/// Categories every new record starts with
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Food", "Transportation", "Entertainment"];

/// Validation errors for record mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    NegativeAmount { field: &'static str },
    EmptyLabel { field: &'static str },
    DuplicateCategory(String),
    /// Adding the amount would overflow the running total
    TotalTooLarge { field: &'static str },
}

impl std::fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount { field } => write!(f, "{} cannot be negative", field),
            Self::EmptyLabel { field } => write!(f, "{} cannot be empty", field),
            Self::DuplicateCategory(name) => write!(f, "Category '{}' already exists", name),
            Self::TotalTooLarge { field } => write!(f, "{} would overflow the total", field),
        }
    }
}

impl std::error::Error for RecordValidationError {}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// A user's budget, expenses, investments, income and savings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Monthly budget
    #[serde(default)]
    pub budget: Money,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub investments: Vec<Investment>,

    #[serde(default)]
    pub income_sources: Vec<IncomeSource>,

    /// Expense categories offered to the user, in display order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    #[serde(default)]
    pub current_savings: Money,
}

impl Default for FinancialRecord {
    fn default() -> Self {
        Self {
            budget: Money::zero(),
            expenses: Vec::new(),
            investments: Vec::new(),
            income_sources: Vec::new(),
            categories: default_categories(),
            current_savings: Money::zero(),
        }
    }
}

fn check_amount(amount: Money, field: &'static str) -> Result<(), RecordValidationError> {
    if amount.is_negative() {
        return Err(RecordValidationError::NegativeAmount { field });
    }
    Ok(())
}

fn check_total(total: Money, amount: Money, field: &'static str) -> Result<(), RecordValidationError> {
    total
        .checked_add(amount)
        .map(|_| ())
        .ok_or(RecordValidationError::TotalTooLarge { field })
}

fn check_label(label: &str, field: &'static str) -> Result<String, RecordValidationError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(RecordValidationError::EmptyLabel { field });
    }
    Ok(label.to_string())
}

impl FinancialRecord {
    /// Append an expense
    pub fn add_expense(&mut self, category: &str, amount: Money) -> Result<(), RecordValidationError> {
        check_amount(amount, "Expense amount")?;
        check_total(self.total_expenses(), amount, "Expense amount")?;
        let category = check_label(category, "Expense category")?;
        self.expenses.push(Expense::new(category, amount));
        Ok(())
    }

    /// Append an investment
    pub fn add_investment(&mut self, kind: &str, amount: Money) -> Result<(), RecordValidationError> {
        check_amount(amount, "Investment amount")?;
        check_total(self.total_investments(), amount, "Investment amount")?;
        let kind = check_label(kind, "Investment type")?;
        self.investments.push(Investment::new(kind, amount));
        Ok(())
    }

    /// Append an income source
    pub fn add_income(&mut self, source: &str, amount: Money) -> Result<(), RecordValidationError> {
        check_amount(amount, "Income amount")?;
        check_total(self.total_income(), amount, "Income amount")?;
        let source = check_label(source, "Income source")?;
        self.income_sources.push(IncomeSource::new(source, amount));
        Ok(())
    }

    /// Replace the monthly budget
    pub fn set_budget(&mut self, amount: Money) -> Result<(), RecordValidationError> {
        check_amount(amount, "Budget")?;
        self.budget = amount;
        Ok(())
    }

    /// Replace the current savings balance
    pub fn set_current_savings(&mut self, amount: Money) -> Result<(), RecordValidationError> {
        check_amount(amount, "Savings")?;
        self.current_savings = amount;
        Ok(())
    }

    /// Add an expense category; names are case-sensitive and unique
    pub fn add_category(&mut self, name: &str) -> Result<(), RecordValidationError> {
        let name = check_label(name, "Category name")?;
        if self.has_category(&name) {
            return Err(RecordValidationError::DuplicateCategory(name));
        }
        self.categories.push(name);
        Ok(())
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn total_expenses(&self) -> Money {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn total_investments(&self) -> Money {
        self.investments.iter().map(|i| i.amount).sum()
    }

    pub fn total_income(&self) -> Money {
        self.income_sources.iter().map(|i| i.amount).sum()
    }

    /// Budget minus total expenses; negative when over budget
    pub fn remaining_budget(&self) -> Money {
        self.budget - self.total_expenses()
    }
}

/// A stored user: password hash plus financial record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Argon2 PHC string
    pub password_hash: String,

    #[serde(flatten)]
    pub record: FinancialRecord,
}

impl UserRecord {
    /// A freshly registered user with default record fields
    pub fn new(password_hash: String) -> Self {
        Self {
            password_hash,
            record: FinancialRecord::default(),
        }
    }
}
