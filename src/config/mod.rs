//! Configuration module for the finance tracker
//!
//! This module provides configuration management including:
//! - Platform config directory resolution
//! - User settings persistence
//! - Password hashing cost parameters

pub mod paths;
pub mod settings;

pub use paths::FinancePaths;
pub use settings::Settings;
