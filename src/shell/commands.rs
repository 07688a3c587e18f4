//! Shell command grammar
//!
//! Each input line is split into words (double or single quotes group words
//! containing spaces) and parsed with clap, so `help` and per-command usage
//! errors come for free.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;

/// One parsed shell line
#[derive(Parser, Debug)]
#[command(
    name = "finance",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Interactive finance tracker. Log in to start recording."
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Create a new account
    Register {
        username: String,
        /// Prompted for when omitted
        password: Option<String>,
    },

    /// Log in and load your record
    Login {
        username: String,
        /// Prompted for when omitted
        password: Option<String>,
    },

    /// Save your record and log out
    Logout,

    /// Show who is logged in
    Whoami,

    /// Set the monthly budget
    Budget {
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Set current savings
    Savings {
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Record an expense
    Expense {
        category: String,
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Record an investment (e.g. Stocks, Bonds, "Mutual Funds")
    Invest {
        #[arg(value_name = "TYPE")]
        kind: String,
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Record an income source
    Income {
        source: String,
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Add an expense category
    Category { name: String },

    /// List part of your record
    Show {
        #[arg(value_enum, default_value = "summary")]
        what: ShowTarget,
    },

    /// Chart amounts grouped by label
    Chart {
        #[arg(value_enum)]
        what: ChartTarget,
        /// Also write the grouped totals to a CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Show progress of current savings toward a goal
    Goal {
        #[arg(allow_hyphen_values = true)]
        amount: Money,
        #[arg(trailing_var_arg = true)]
        description: Vec<String>,
    },

    /// Export your record
    #[command(subcommand)]
    Export(ExportCommand),

    /// Leave the shell (logs out first)
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTarget {
    Summary,
    Budget,
    Expenses,
    Investments,
    Income,
    Categories,
    Savings,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTarget {
    Expenses,
    Investments,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ExportCommand {
    /// budget.csv, expenses.csv, investments.csv and income_sources.csv
    Csv { dir: PathBuf },
    /// Full record as JSON
    Json { file: PathBuf },
    /// Full record as YAML
    Yaml { file: PathBuf },
}

/// Split a line into words, honoring quotes
pub fn tokenize(line: &str) -> FinanceResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(FinanceError::Validation("Unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}
