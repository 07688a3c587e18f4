//! Display formatting for terminal output

pub mod record;
pub mod report;

pub use record::{format_categories, format_item_list, format_record_summary};
pub use report::{format_backup_list, format_percentage};
