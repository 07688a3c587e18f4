//! Distribution report
//!
//! Groups line items by label and sums their amounts, the data behind the
//! expense and investment charts.

use std::io::Write;

use crate::display::report::{format_bar, format_percentage};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{LineItem, Money};

/// One label's share of the total
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub total: Money,
    /// Number of items with this label
    pub count: usize,
    /// Share of the grand total, 0 to 100
    pub percentage: f64,
}

/// Amounts grouped by label
#[derive(Debug, Clone)]
pub struct Distribution {
    pub title: String,
    /// Slices in the order their label first appeared
    pub slices: Vec<Slice>,
    pub total: Money,
}

impl Distribution {
    /// Group `items` by exact label
    pub fn generate<T: LineItem>(title: impl Into<String>, items: &[T]) -> Self {
        let mut slices: Vec<Slice> = Vec::new();
        let mut total = Money::zero();

        for item in items {
            total += item.amount();
            match slices.iter_mut().find(|s| s.label == item.label()) {
                Some(slice) => {
                    slice.total += item.amount();
                    slice.count += 1;
                }
                None => slices.push(Slice {
                    label: item.label().to_string(),
                    total: item.amount(),
                    count: 1,
                    percentage: 0.0,
                }),
            }
        }

        for slice in &mut slices {
            slice.percentage = if total.is_zero() {
                0.0
            } else {
                (slice.total.cents() as f64 / total.cents() as f64) * 100.0
            };
        }

        Self {
            title: title.into(),
            slices,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Format the report as a text bar chart
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        const BAR_WIDTH: usize = 30;

        let mut output = String::new();
        output.push_str(&format!("{}\n", self.title));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.slices.is_empty() {
            output.push_str("No data to display.\n");
            return output;
        }

        let label_width = self
            .slices
            .iter()
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(5);

        for slice in &self.slices {
            output.push_str(&format!(
                "{:<width$} {:>12} {:>6} {}\n",
                slice.label,
                slice.total.format_with_symbol(currency_symbol),
                format_percentage(slice.percentage),
                format_bar(slice.percentage, 100.0, BAR_WIDTH),
                width = label_width
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<width$} {:>12}\n",
            "Total",
            self.total.format_with_symbol(currency_symbol),
            width = label_width
        ));

        output
    }

    /// Write `label,total,count,percentage` rows
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["label", "total", "count", "percentage"])?;

        for slice in &self.slices {
            wtr.write_record([
                slice.label.clone(),
                slice.total.to_decimal_string(),
                slice.count.to_string(),
                format!("{:.2}", slice.percentage),
            ])?;
        }

        wtr.flush()
            .map_err(|e| FinanceError::Export(e.to_string()))?;
        Ok(())
    }
}
