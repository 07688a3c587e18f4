//! Reports over a financial record
//!
//! - `Distribution`: amounts grouped by label, for the expense and
//!   investment charts
//! - `SavingsProgress`: how far current savings are toward a goal

pub mod distribution;
pub mod savings;

pub use distribution::{Distribution, Slice};
pub use savings::SavingsProgress;
