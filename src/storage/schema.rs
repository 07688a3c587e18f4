//! On-disk schema of the user store and its migrations
//!
//! Current layout (version 1):
//!
//! ```json
//! { "schema_version": 1,
//!   "users": { "alice": { "password_hash": "$argon2id$...", "budget": 0,
//!              "expenses": [{"category": "Food", "amount": 4200}], ... } } }
//! ```
//!
//! Amounts are integer cents. Version 0 is the legacy layout: a bare map of
//! username to `{password, budget, expenses, ...}` with decimal amounts and no
//! version field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Expense, FinancialRecord, IncomeSource, Investment, Money, UserRecord, DEFAULT_CATEGORIES,
};

/// Newest schema version this build reads and writes
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Username to stored user, ordered by username
pub type UserMap = BTreeMap<String, UserRecord>;

/// The complete user store document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub users: UserMap,
}

impl StoreDocument {
    pub fn new(users: UserMap) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            users,
        }
    }
}

/// Borrowing form of [`StoreDocument`] used when saving
#[derive(Serialize)]
pub(crate) struct StoreDocumentRef<'a> {
    pub schema_version: u32,
    pub users: &'a UserMap,
}

impl<'a> StoreDocumentRef<'a> {
    pub fn new(users: &'a UserMap) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            users,
        }
    }
}

/// Work out which schema version a raw document uses
///
/// A numeric top-level `schema_version` is authoritative. Anything else is a
/// legacy version 0 map (where `schema_version` could only be a username).
pub fn detect_version(value: &Value) -> FinanceResult<u32> {
    match value.get("schema_version") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| corrupt(format!("invalid schema_version {}", n))),
        _ => Ok(0),
    }
}

/// Decode a raw document of any known version into the current schema
pub fn migrate(value: Value) -> FinanceResult<StoreDocument> {
    match detect_version(&value)? {
        0 => migrate_v0(value),
        CURRENT_SCHEMA_VERSION => serde_json::from_value(value)
            .map_err(|e| corrupt(format!("invalid store document: {}", e))),
        v => Err(corrupt(format!(
            "unsupported schema version {} (newest known is {})",
            v, CURRENT_SCHEMA_VERSION
        ))),
    }
}

fn corrupt(msg: String) -> FinanceError {
    FinanceError::StorageCorrupt(msg)
}

#[derive(Deserialize)]
struct LegacyExpense {
    category: String,
    amount: f64,
}

#[derive(Deserialize)]
struct LegacyInvestment {
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
}

#[derive(Deserialize)]
struct LegacyIncome {
    source: String,
    amount: f64,
}

#[derive(Deserialize)]
struct LegacyUser {
    password: String,
    #[serde(default)]
    budget: f64,
    #[serde(default)]
    expenses: Vec<LegacyExpense>,
    #[serde(default)]
    investments: Vec<LegacyInvestment>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    income_sources: Vec<LegacyIncome>,
    #[serde(default)]
    current_savings: f64,
}

fn legacy_amount(username: &str, field: &str, amount: f64) -> FinanceResult<Money> {
    match Money::from_decimal(amount) {
        Some(m) if !m.is_negative() => Ok(m),
        _ => Err(corrupt(format!(
            "user '{}' has invalid {} amount {}",
            username, field, amount
        ))),
    }
}

fn migrate_v0(value: Value) -> FinanceResult<StoreDocument> {
    let legacy: BTreeMap<String, LegacyUser> = serde_json::from_value(value)
        .map_err(|e| corrupt(format!("invalid legacy store: {}", e)))?;

    let mut users = UserMap::new();
    for (username, old) in legacy {
        let mut record = FinancialRecord {
            budget: legacy_amount(&username, "budget", old.budget)?,
            current_savings: legacy_amount(&username, "savings", old.current_savings)?,
            categories: old
                .categories
                .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()),
            ..FinancialRecord::default()
        };

        for e in old.expenses {
            let amount = legacy_amount(&username, "expense", e.amount)?;
            record.expenses.push(Expense::new(e.category, amount));
        }
        for i in old.investments {
            let amount = legacy_amount(&username, "investment", i.amount)?;
            record.investments.push(Investment::new(i.kind, amount));
        }
        for i in old.income_sources {
            let amount = legacy_amount(&username, "income", i.amount)?;
            record.income_sources.push(IncomeSource::new(i.source, amount));
        }

        users.insert(
            username,
            UserRecord {
                password_hash: old.password,
                record,
            },
        );
    }

    Ok(StoreDocument::new(users))
}
