//! Finance Tracker - terminal personal finance tracker
//!
//! Users register and log in, then record a monthly budget, expenses,
//! investments, income and savings. Records are kept per user in one JSON
//! store with hashed passwords and are written back on logout.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Money, line items and the per-user financial record
//! - `crypto`: Password hashing and zeroizing password buffers
//! - `storage`: Versioned JSON credential store
//! - `session`: Working copy of the logged-in user's record
//! - `services`: Registration, login and logout
//! - `audit`: Audit logging system
//! - `backup`: Store backups, restore and corrupt-file quarantine
//! - `reports`: Distributions and savings goal progress
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `shell`: Interactive command loop and handlers
//! - `cli`: One-shot subcommands
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::config::{FinancePaths, Settings};
//! use finance_tracker::shell::ShellContext;
//!
//! let paths = FinancePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let (ctx, _) = ShellContext::open(paths, settings)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod shell;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
