use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use finance_tracker::audit::AuditLogger;
use finance_tracker::cli::{
    handle_backup_command, handle_register_command, handle_users_command, read_password,
};
use finance_tracker::config::{FinancePaths, Settings};
use finance_tracker::shell::{Shell, ShellContext};
use finance_tracker::storage::CredentialStore;

#[derive(Parser)]
#[command(
    name = "finance",
    author = "Kaylee Beyene",
    version,
    about = "Terminal personal finance tracker",
    long_about = "Track a monthly budget, expenses, investments and income per user. \
                  Run without a subcommand to start the interactive shell."
)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// Register a new user
    Register {
        username: String,
        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// List registered usernames
    Users,

    /// Show current configuration and paths
    Config,

    /// Backup management commands
    #[command(subcommand)]
    Backup(finance_tracker::cli::BackupCommands),
}

fn init_tracing(verbose: u8, settings: &Settings) {
    let level = match verbose {
        0 => settings.tracing_level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FinancePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(cli.verbose, &settings);

    let audit = if settings.audit_enabled {
        AuditLogger::new(paths.audit_log())
    } else {
        AuditLogger::disabled(paths.audit_log())
    };

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let (ctx, quarantined) = ShellContext::open(paths, settings)?;
            if let Some(moved) = quarantined {
                eprintln!(
                    "Warning: the user store could not be read and was moved to {}. \
                     Starting with an empty store.",
                    moved.display()
                );
            }

            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let mut shell = Shell::new(ctx, stdin.lock(), io::stdout(), interactive);
            shell.run()?;
        }
        Commands::Register {
            username,
            password_stdin,
        } => {
            paths.ensure_directories()?;
            let store = CredentialStore::open(&paths, &settings);
            let password = read_password(password_stdin, io::stdin().lock())?;
            handle_register_command(&store, &audit, &username, &password)?;
        }
        Commands::Users => {
            let store = CredentialStore::open(&paths, &settings);
            handle_users_command(&store)?;
        }
        Commands::Config => {
            println!("Finance Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("User store:       {}", paths.users_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!(
                "  Password hashing:  argon2id m={} t={} p={}",
                settings.hashing.memory_cost, settings.hashing.time_cost, settings.hashing.parallelism
            );
            println!("  Backups kept:      {}", settings.backup_retention.keep_count);
            println!("  Audit log:         {}", settings.audit_enabled);
            println!("  Recover corrupt:   {}", settings.recover_corrupt_store);
            println!("  Log level:         {}", settings.log_level);
        }
        Commands::Backup(cmd) => {
            handle_backup_command(&paths, &settings, &audit, cmd)?;
        }
    }

    Ok(())
}
