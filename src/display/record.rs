//! Record display formatting
//!
//! Formats the fields of a financial record for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{FinancialRecord, LineItem};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Format a list of line items as a numbered table with a total
pub fn format_item_list<T: LineItem>(heading: &str, items: &[T], currency_symbol: &str) -> String {
    if items.is_empty() {
        return format!("No {} recorded.", heading.to_lowercase());
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemRow {
            index: i + 1,
            label: item.label().to_string(),
            amount: item.amount().format_with_symbol(currency_symbol),
        })
        .collect();

    let total: crate::models::Money = items.iter().map(|i| i.amount()).sum();

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\n{}\nTotal: {}",
        heading,
        table,
        total.format_with_symbol(currency_symbol)
    )
}

/// Format the category list, one per line
pub fn format_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return "No categories defined.".to_string();
    }

    let mut output = String::from("Categories\n");
    for category in categories {
        output.push_str(&format!("  - {}\n", category));
    }
    output.trim_end().to_string()
}

/// Format the headline numbers of a record
pub fn format_record_summary(record: &FinancialRecord, currency_symbol: &str) -> String {
    let money = |m: crate::models::Money| m.format_with_symbol(currency_symbol);

    let rows = vec![
        SummaryRow {
            field: "Budget",
            value: money(record.budget),
        },
        SummaryRow {
            field: "Expenses",
            value: format!("{} ({})", money(record.total_expenses()), record.expenses.len()),
        },
        SummaryRow {
            field: "Remaining",
            value: money(record.remaining_budget()),
        },
        SummaryRow {
            field: "Investments",
            value: format!(
                "{} ({})",
                money(record.total_investments()),
                record.investments.len()
            ),
        },
        SummaryRow {
            field: "Income",
            value: format!(
                "{} ({})",
                money(record.total_income()),
                record.income_sources.len()
            ),
        },
        SummaryRow {
            field: "Savings",
            value: money(record.current_savings),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}
