//! JSON export
//!
//! Snapshots one user's complete record with schema versioning. The password
//! hash is never part of an export.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{FinancialRecord, Money};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full record export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub username: String,

    /// Amounts are integer cents
    pub record: FinancialRecord,

    pub summary: ExportSummary,
}

/// Totals for quick reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub expense_count: usize,
    pub investment_count: usize,
    pub income_count: usize,
    pub total_expenses: Money,
    pub total_investments: Money,
    pub total_income: Money,
    pub remaining_budget: Money,
}

impl RecordExport {
    pub fn new(username: &str, record: &FinancialRecord) -> Self {
        let summary = ExportSummary {
            expense_count: record.expenses.len(),
            investment_count: record.investments.len(),
            income_count: record.income_sources.len(),
            total_expenses: record.total_expenses(),
            total_investments: record.total_investments(),
            total_income: record.total_income(),
            remaining_budget: record.remaining_budget(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            username: username.to_string(),
            record: record.clone(),
            summary,
        }
    }
}

/// Export a record to JSON
pub fn export_full_json<W: Write>(
    username: &str,
    record: &FinancialRecord,
    writer: &mut W,
    pretty: bool,
) -> FinanceResult<()> {
    let export = RecordExport::new(username, record);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}
