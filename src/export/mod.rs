//! Export of a user's record
//!
//! - CSV: one spreadsheet-friendly file per field (budget, expenses,
//!   investments, income sources)
//! - JSON: machine-readable full record export
//! - YAML: human-readable full record export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{
    export_budget_csv, export_expenses_csv, export_income_csv, export_investments_csv,
    export_record_csv,
};
pub use json::{export_full_json, RecordExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
