//! Interactive shell
//!
//! A line-oriented loop over any `BufRead`: each line is tokenized, parsed
//! into a `ShellCommand` and dispatched to a handler. A failing command
//! prints one error line and the loop continues. End of input behaves like
//! `quit`, and quitting while logged in saves the session first. If that save
//! fails, `quit` keeps the shell running so it can be retried.

pub mod commands;
pub mod handlers;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};

use crate::audit::AuditLogger;
use crate::backup::BackupManager;
use crate::config::{FinancePaths, Settings};
use crate::crypto::SecureString;
use crate::error::{FinanceError, FinanceResult};
use crate::session::Session;
use crate::storage::CredentialStore;

pub use commands::{tokenize, ChartTarget, ExportCommand, ShellCommand, ShellLine, ShowTarget};

/// Everything a handler can touch
pub struct ShellContext {
    pub paths: FinancePaths,
    pub settings: Settings,
    pub store: CredentialStore,
    pub audit: AuditLogger,
    pub session: Session,
}

impl ShellContext {
    pub fn new(paths: FinancePaths, settings: Settings) -> Self {
        let store = CredentialStore::open(&paths, &settings);
        let audit = if settings.audit_enabled {
            AuditLogger::new(paths.audit_log())
        } else {
            AuditLogger::disabled(paths.audit_log())
        };

        Self {
            paths,
            settings,
            store,
            audit,
            session: Session::new(),
        }
    }

    /// Create directories and check the store before the first command
    ///
    /// With `recover_corrupt_store` set, an unreadable store is moved into
    /// the backup directory and its new location returned. Otherwise a
    /// corrupt store is an error.
    pub fn open(paths: FinancePaths, settings: Settings) -> FinanceResult<(Self, Option<PathBuf>)> {
        paths.ensure_directories()?;
        let ctx = Self::new(paths, settings);

        let quarantined = if ctx.settings.recover_corrupt_store {
            let backups =
                BackupManager::new(ctx.paths.clone(), ctx.settings.backup_retention.clone());
            ctx.store.load_or_recover(&backups)?.quarantined
        } else {
            ctx.store.load()?;
            None
        };

        Ok((ctx, quarantined))
    }
}

/// Drives the read-eval-print loop
pub struct Shell<R, W> {
    ctx: ShellContext,
    input: R,
    output: W,
    interactive: bool,
}

enum Flow {
    Continue,
    Quit,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// `interactive` enables prompts and hidden password entry on the terminal
    pub fn new(ctx: ShellContext, input: R, output: W, interactive: bool) -> Self {
        Self {
            ctx,
            input,
            output,
            interactive,
        }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    fn read_line(&mut self) -> FinanceResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self) -> FinanceResult<()> {
        if self.interactive {
            let prompt = match self.ctx.session.current_user() {
                Some(user) => format!("{}> ", user),
                None => "finance> ".to_string(),
            };
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
        }
        Ok(())
    }

    /// Use the password given on the line, or ask for one
    fn password(&mut self, given: Option<String>) -> FinanceResult<SecureString> {
        if let Some(password) = given {
            return Ok(SecureString::from(password));
        }

        if self.interactive {
            return rpassword::prompt_password("Password: ")
                .map(SecureString::from)
                .map_err(|e| FinanceError::Io(format!("Failed to read password: {}", e)));
        }

        match self.read_line()? {
            Some(line) => Ok(SecureString::from(line)),
            None => Err(FinanceError::Validation("Password cannot be empty".into())),
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> FinanceResult<()> {
        if self.interactive {
            writeln!(
                self.output,
                "Finance Tracker {}. Type 'help' for commands.",
                env!("CARGO_PKG_VERSION")
            )?;
        }

        loop {
            self.prompt()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match self.execute(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => match self.finish() {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        writeln!(self.output, "Error: {}", e)?;
                        writeln!(
                            self.output,
                            "Your changes are not saved yet. Fix the problem and quit again."
                        )?;
                    }
                },
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }

        // End of input: nobody is left to retry, so a failed save is fatal
        if let Err(e) = self.finish() {
            writeln!(self.output, "Error: {}", e)?;
            return Err(e);
        }
        Ok(())
    }

    /// Log out if needed; the session survives a failed save
    fn finish(&mut self) -> FinanceResult<()> {
        if self.ctx.session.is_active() {
            let message = handlers::on_logout(&mut self.ctx).map_err(|e| {
                warn!(error = %e, "logout on exit failed");
                e
            })?;
            writeln!(self.output, "{}", message)?;
        }
        Ok(())
    }

    /// Parse and run one line
    fn execute(&mut self, line: &str) -> FinanceResult<Flow> {
        let words = tokenize(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(self.output, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(command = %words[0], "dispatching");

        let message = match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Register { username, password } => {
                let password = self.password(password)?;
                handlers::on_register(&mut self.ctx, &username, &password)?
            }
            ShellCommand::Login { username, password } => {
                let password = self.password(password)?;
                handlers::on_login(&mut self.ctx, &username, &password)?
            }
            ShellCommand::Logout => handlers::on_logout(&mut self.ctx)?,
            ShellCommand::Whoami => handlers::on_whoami(&self.ctx)?,
            ShellCommand::Budget { amount } => handlers::on_set_budget(&mut self.ctx, amount)?,
            ShellCommand::Savings { amount } => handlers::on_set_savings(&mut self.ctx, amount)?,
            ShellCommand::Expense { category, amount } => {
                handlers::on_add_expense(&mut self.ctx, &category, amount)?
            }
            ShellCommand::Invest { kind, amount } => {
                handlers::on_add_investment(&mut self.ctx, &kind, amount)?
            }
            ShellCommand::Income { source, amount } => {
                handlers::on_add_income(&mut self.ctx, &source, amount)?
            }
            ShellCommand::Category { name } => handlers::on_add_category(&mut self.ctx, &name)?,
            ShellCommand::Show { what } => handlers::on_show(&self.ctx, what)?,
            ShellCommand::Chart { what, csv } => {
                handlers::on_distribution(&self.ctx, what, csv.as_deref())?
            }
            ShellCommand::Goal {
                amount,
                description,
            } => handlers::on_savings_goal(&self.ctx, amount, &description.join(" "))?,
            ShellCommand::Export(target) => handlers::on_export(&self.ctx, &target)?,
        };

        writeln!(self.output, "{}", message)?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashingParams;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn settings() -> Settings {
        Settings {
            hashing: HashingParams::with_values(256, 1, 1),
            ..Settings::default()
        }
    }

    fn run_script(temp: &TempDir, script: &str) -> String {
        let paths = FinancePaths::with_base_dir(temp.path().to_path_buf());
        let (ctx, _) = ShellContext::open(paths, settings()).unwrap();
        let mut output = Vec::new();
        Shell::new(ctx, Cursor::new(script.as_bytes().to_vec()), &mut output, false)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_alice_scenario_across_runs() {
        let temp = TempDir::new().unwrap();

        let out = run_script(
            &temp,
            "register alice pw123\n\
             register alice other\n\
             login alice pw123\n\
             expense Food 42\n\
             logout\n",
        );
        assert!(out.contains("Registered 'alice'"));
        assert!(out.contains("Error: Username already exists: alice"));
        assert!(out.contains("Added expense: Food $42.00"));
        assert!(out.contains("Saved and logged out 'alice'."));

        let out = run_script(&temp, "login alice pw123\nshow expenses\n");
        assert!(out.contains("Food"));
        assert!(out.contains("$42.00"));
        // End of input logs out and saves
        assert!(out.contains("Saved and logged out"));
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let temp = TempDir::new().unwrap();
        let out = run_script(
            &temp,
            "expense Food 10\n\
             bogus\n\
             login \"unterminated\n\
             whoami\n",
        );

        assert!(out.contains("Error: Precondition failed: no user is logged in"));
        assert!(out.contains("unrecognized subcommand"));
        assert!(out.contains("Error: Validation error: Unterminated quote"));
        assert!(out.contains("Not logged in."));
    }

    #[test]
    fn test_password_on_next_line() {
        let temp = TempDir::new().unwrap();
        let out = run_script(&temp, "register bob\nsecret\nlogin bob\nsecret\nwhoami\nquit\n");
        assert!(out.contains("Registered 'bob'"));
        assert!(out.contains("Logged in as bob"));
    }

    #[test]
    fn test_quit_saves_session() {
        let temp = TempDir::new().unwrap();
        run_script(
            &temp,
            "register alice pw123\nlogin alice pw123\nbudget 1500\nquit\nexpense Ignored 1\n",
        );

        let out = run_script(&temp, "login alice pw123\nshow budget\nshow expenses\n");
        assert!(out.contains("Budget: $1500.00"));
        assert!(out.contains("No expenses recorded."));
    }

    #[test]
    fn test_failed_save_on_quit_keeps_session() {
        let temp = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp.path().to_path_buf());
        let (mut ctx, _) = ShellContext::open(paths.clone(), settings()).unwrap();
        handlers::on_register(&mut ctx, "alice", &"pw123".into()).unwrap();
        handlers::on_login(&mut ctx, "alice", &"pw123".into()).unwrap();
        ctx.session.add_expense("Food", crate::models::Money::from_cents(4200)).unwrap();

        let good = fs::read(paths.users_file()).unwrap();
        fs::write(paths.users_file(), "garbage").unwrap();

        let mut output = Vec::new();
        let mut ctx = {
            let input = Cursor::new(b"quit\nwhoami\n".to_vec());
            let mut shell = Shell::new(ctx, input, &mut output, false);
            assert!(shell.run().unwrap_err().is_corrupt());
            assert!(shell.context().session.is_active());
            shell.ctx
        };

        fs::write(paths.users_file(), good).unwrap();
        handlers::on_logout(&mut ctx).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Your changes are not saved yet"));
        assert!(text.contains("Logged in as alice"));
        let record = ctx.store.fetch_record("alice").unwrap().unwrap();
        assert_eq!(record.expenses.len(), 1);
    }

    #[test]
    fn test_chart_and_export() {
        let temp = TempDir::new().unwrap();
        let export_dir = temp.path().join("out");
        let script = format!(
            "register alice pw\nlogin alice pw\nexpense Food 10\nexpense Food 15\n\
             invest \"Mutual Funds\" 100\nchart expenses\nexport csv \"{}\"\n",
            export_dir.display()
        );

        let out = run_script(&temp, &script);
        assert!(out.contains("Expense Distribution"));
        assert!(out.contains("$25.00"));
        assert_eq!(
            fs::read_to_string(export_dir.join("investments.csv")).unwrap(),
            "type,amount\nMutual Funds,100.00\n"
        );
    }

    #[test]
    fn test_open_quarantines_corrupt_store() {
        let temp = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        fs::write(paths.users_file(), "not json").unwrap();

        let (ctx, quarantined) = ShellContext::open(paths, settings()).unwrap();
        assert!(quarantined.unwrap().exists());
        assert!(ctx.store.load().unwrap().is_empty());
    }

    #[test]
    fn test_open_without_recovery_fails_on_corrupt_store() {
        let temp = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        fs::write(paths.users_file(), "not json").unwrap();

        let settings = Settings {
            recover_corrupt_store: false,
            ..settings()
        };
        assert!(ShellContext::open(paths, settings).err().unwrap().is_corrupt());
    }
}
