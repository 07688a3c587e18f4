//! CSV export
//!
//! One file per record field, each with a header row. Amounts are written in
//! decimal form (`12.50`).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{FinancialRecord, LineItem, Money};

pub const BUDGET_FILE: &str = "budget.csv";
pub const EXPENSES_FILE: &str = "expenses.csv";
pub const INVESTMENTS_FILE: &str = "investments.csv";
pub const INCOME_FILE: &str = "income_sources.csv";

fn finish<W: Write>(mut wtr: csv::Writer<W>) -> FinanceResult<()> {
    wtr.flush()
        .map_err(|e| FinanceError::Export(e.to_string()))
}

/// Write the single-row budget table
pub fn export_budget_csv<W: Write>(budget: Money, writer: W) -> FinanceResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Budget"])?;
    wtr.write_record([budget.to_decimal_string()])?;
    finish(wtr)
}

/// Write label/amount rows under the given header
pub fn export_items_csv<W: Write, T: LineItem>(
    header: [&str; 2],
    items: &[T],
    writer: W,
) -> FinanceResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header)?;
    for item in items {
        wtr.write_record([item.label(), item.amount().to_decimal_string().as_str()])?;
    }
    finish(wtr)
}

pub fn export_expenses_csv<W: Write>(record: &FinancialRecord, writer: W) -> FinanceResult<()> {
    export_items_csv(["category", "amount"], &record.expenses, writer)
}

pub fn export_investments_csv<W: Write>(record: &FinancialRecord, writer: W) -> FinanceResult<()> {
    export_items_csv(["type", "amount"], &record.investments, writer)
}

pub fn export_income_csv<W: Write>(record: &FinancialRecord, writer: W) -> FinanceResult<()> {
    export_items_csv(["source", "amount"], &record.income_sources, writer)
}

fn create(dir: &Path, name: &str) -> FinanceResult<(PathBuf, File)> {
    let path = dir.join(name);
    let file = File::create(&path)
        .map_err(|e| FinanceError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    Ok((path, file))
}

/// Write all four CSV files into `dir`, creating it if needed
///
/// Existing files with the same names are overwritten. Returns the written
/// paths in a fixed order.
pub fn export_record_csv(record: &FinancialRecord, dir: &Path) -> FinanceResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| FinanceError::Export(format!("Failed to create {}: {}", dir.display(), e)))?;

    let mut written = Vec::with_capacity(4);

    let (path, file) = create(dir, BUDGET_FILE)?;
    export_budget_csv(record.budget, file)?;
    written.push(path);

    let (path, file) = create(dir, EXPENSES_FILE)?;
    export_expenses_csv(record, file)?;
    written.push(path);

    let (path, file) = create(dir, INVESTMENTS_FILE)?;
    export_investments_csv(record, file)?;
    written.push(path);

    let (path, file) = create(dir, INCOME_FILE)?;
    export_income_csv(record, file)?;
    written.push(path);

    debug!(dir = %dir.display(), "exported record as csv");
    Ok(written)
}
