//! CLI command handlers
//!
//! Bridges clap argument parsing for the one-shot subcommands with the
//! service layer. The interactive commands live in `shell`.

pub mod backup;
pub mod user;

pub use backup::{handle_backup_command, BackupCommands};
pub use user::{handle_register_command, handle_users_command, read_password};
