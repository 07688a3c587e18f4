//! YAML export
//!
//! Same content as the JSON export, in a human-readable layout.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::RecordExport;
use crate::models::FinancialRecord;

fn export_err(e: impl std::fmt::Display) -> FinanceError {
    FinanceError::Export(e.to_string())
}

/// Export a record to YAML with a comment header
pub fn export_full_yaml<W: Write>(
    username: &str,
    record: &FinancialRecord,
    writer: &mut W,
) -> FinanceResult<()> {
    let export = RecordExport::new(username, record);

    writeln!(writer, "# Finance Tracker Record Export").map_err(export_err)?;
    writeln!(writer, "# User: {}", export.username).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "# Amounts are in cents.").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}
