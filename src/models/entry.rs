//! Line items of a financial record
//!
//! Expenses, investments and income sources are plain label/amount pairs.
//! They have no identity beyond their position in the owning list.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Investment types the shell knows; others are accepted and flagged
pub const INVESTMENT_TYPES: [&str; 3] = ["Stocks", "Bonds", "Mutual Funds"];

/// A single expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub category: String,
    pub amount: Money,
}

impl Expense {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// A single investment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    /// Investment type, e.g. "Stocks"
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Money,
}

impl Investment {
    pub fn new(kind: impl Into<String>, amount: Money) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

/// A single income source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub source: String,
    pub amount: Money,
}

impl IncomeSource {
    pub fn new(source: impl Into<String>, amount: Money) -> Self {
        Self {
            source: source.into(),
            amount,
        }
    }
}

/// Anything with a label and an amount, used by reports and exports
pub trait LineItem {
    fn label(&self) -> &str;
    fn amount(&self) -> Money;
}

impl LineItem for Expense {
    fn label(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl LineItem for Investment {
    fn label(&self) -> &str {
        &self.kind
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl LineItem for IncomeSource {
    fn label(&self) -> &str {
        &self.source
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_serializes_type_field() {
        let inv = Investment::new("Stocks", Money::from_cents(10000));
        let json = serde_json::to_string(&inv).unwrap();
        assert_eq!(json, r#"{"type":"Stocks","amount":10000}"#);

        let back: Investment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn test_line_item_labels() {
        let e = Expense::new("Food", Money::from_cents(4200));
        let i = IncomeSource::new("Salary", Money::from_cents(100));
        assert_eq!(e.label(), "Food");
        assert_eq!(i.label(), "Salary");
        assert_eq!(e.amount().cents(), 4200);
    }
}
