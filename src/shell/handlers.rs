//! Command handlers
//!
//! One function per shell action. Each takes already-parsed input, does its
//! work against the context, and returns the one-line (or table) message the
//! shell prints. Errors are returned, never printed here.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::crypto::SecureString;
use crate::display::{format_categories, format_item_list, format_record_summary};
use crate::error::{FinanceError, FinanceResult};
use crate::export::{export_full_json, export_full_yaml, export_record_csv};
use crate::models::{Expense, IncomeSource, Investment, Money, INVESTMENT_TYPES};
use crate::reports::{Distribution, SavingsProgress};
use crate::services::AuthService;

use super::commands::{ChartTarget, ExportCommand, ShowTarget};
use super::ShellContext;

/// Append an audit entry for a change that has already been made
///
/// A failed write is logged and otherwise ignored; the change stands.
fn record_audit(ctx: &ShellContext, entry: &AuditEntry) {
    if let Err(e) = ctx.audit.log(entry) {
        warn!(error = %e, operation = %entry.operation, "failed to write audit entry");
    }
}

/// Append an update entry for the active session, if any
fn audit_update<T: Serialize>(
    ctx: &ShellContext,
    entity: EntityType,
    before: Option<&T>,
    after: &T,
) {
    if let Some(active) = ctx.session.active() {
        let entry = AuditEntry::update(entity, &active.username, active.id, before, after);
        record_audit(ctx, &entry);
    }
}

fn money(ctx: &ShellContext, amount: Money) -> String {
    amount.format_with_symbol(&ctx.settings.currency_symbol)
}

pub fn on_register(
    ctx: &mut ShellContext,
    username: &str,
    password: &SecureString,
) -> FinanceResult<String> {
    AuthService::new(&ctx.store, &ctx.audit).register(username, password)?;
    Ok(format!("Registered '{}'. You can now log in.", username))
}

pub fn on_login(
    ctx: &mut ShellContext,
    username: &str,
    password: &SecureString,
) -> FinanceResult<String> {
    AuthService::new(&ctx.store, &ctx.audit).login(&mut ctx.session, username, password)?;
    Ok(format!("Welcome, {}!", username))
}

pub fn on_logout(ctx: &mut ShellContext) -> FinanceResult<String> {
    let outcome = AuthService::new(&ctx.store, &ctx.audit).logout(&mut ctx.session)?;
    if outcome.persisted {
        Ok(format!("Saved and logged out '{}'.", outcome.username))
    } else {
        Ok(format!(
            "Logged out '{}', but the account no longer exists; changes were not saved.",
            outcome.username
        ))
    }
}

pub fn on_whoami(ctx: &ShellContext) -> FinanceResult<String> {
    match ctx.session.active() {
        Some(active) => Ok(format!(
            "Logged in as {} ({}, since {})",
            active.username,
            active.id,
            active.started_at.format("%H:%M:%S UTC")
        )),
        None => Ok("Not logged in.".to_string()),
    }
}

pub fn on_add_expense(ctx: &mut ShellContext, category: &str, amount: Money) -> FinanceResult<String> {
    ctx.session.add_expense(category, amount)?;
    let expense = Expense::new(category.trim(), amount);
    audit_update(ctx, EntityType::Expense, None, &expense);
    debug!(category = %expense.category, cents = amount.cents(), "expense added");

    let mut message = format!("Added expense: {} {}", expense.category, money(ctx, amount));
    if !ctx.session.record()?.has_category(&expense.category) {
        message.push_str(" (not in your category list)");
    }
    Ok(message)
}

pub fn on_add_investment(ctx: &mut ShellContext, kind: &str, amount: Money) -> FinanceResult<String> {
    ctx.session.add_investment(kind, amount)?;
    let investment = Investment::new(kind.trim(), amount);
    audit_update(ctx, EntityType::Investment, None, &investment);

    let mut message = format!("Added investment: {} {}", investment.kind, money(ctx, amount));
    if !INVESTMENT_TYPES.contains(&investment.kind.as_str()) {
        message.push_str(" (custom type)");
    }
    Ok(message)
}

pub fn on_add_income(ctx: &mut ShellContext, source: &str, amount: Money) -> FinanceResult<String> {
    ctx.session.add_income(source, amount)?;
    let income = IncomeSource::new(source.trim(), amount);
    audit_update(ctx, EntityType::IncomeSource, None, &income);
    Ok(format!("Added income: {} {}", income.source, money(ctx, amount)))
}

pub fn on_set_budget(ctx: &mut ShellContext, amount: Money) -> FinanceResult<String> {
    let before = ctx.session.budget()?;
    ctx.session.set_budget(amount)?;
    audit_update(ctx, EntityType::Budget, Some(&before), &amount);
    Ok(format!("Budget set to {}", money(ctx, amount)))
}

pub fn on_set_savings(ctx: &mut ShellContext, amount: Money) -> FinanceResult<String> {
    let before = ctx.session.current_savings()?;
    ctx.session.set_current_savings(amount)?;
    audit_update(ctx, EntityType::Savings, Some(&before), &amount);
    Ok(format!("Current savings set to {}", money(ctx, amount)))
}

pub fn on_add_category(ctx: &mut ShellContext, name: &str) -> FinanceResult<String> {
    ctx.session.add_category(name)?;
    let name = name.trim();
    audit_update(ctx, EntityType::Category, None, &name);
    Ok(format!("Added category '{}'", name))
}

pub fn on_show(ctx: &ShellContext, what: ShowTarget) -> FinanceResult<String> {
    let record = ctx.session.record()?;
    let symbol = &ctx.settings.currency_symbol;

    Ok(match what {
        ShowTarget::Summary => format_record_summary(record, symbol),
        ShowTarget::Budget => format!(
            "Budget: {} (remaining {})",
            money(ctx, record.budget),
            money(ctx, record.remaining_budget())
        ),
        ShowTarget::Expenses => format_item_list("Expenses", &record.expenses, symbol),
        ShowTarget::Investments => format_item_list("Investments", &record.investments, symbol),
        ShowTarget::Income => format_item_list("Income sources", &record.income_sources, symbol),
        ShowTarget::Categories => format_categories(&record.categories),
        ShowTarget::Savings => format!("Current savings: {}", money(ctx, record.current_savings)),
    })
}

/// Print the chart, and write its rows to `csv` when given
pub fn on_distribution(
    ctx: &ShellContext,
    what: ChartTarget,
    csv: Option<&Path>,
) -> FinanceResult<String> {
    let record = ctx.session.record()?;
    let report = match what {
        ChartTarget::Expenses => Distribution::generate("Expense Distribution", &record.expenses),
        ChartTarget::Investments => {
            Distribution::generate("Investment Distribution", &record.investments)
        }
    };

    let mut message = report
        .format_terminal(&ctx.settings.currency_symbol)
        .trim_end()
        .to_string();
    if let Some(file) = csv {
        report.export_csv(BufWriter::new(create_export_file(file)?))?;
        message.push_str(&format!("\nWrote {}", file.display()));
    }
    Ok(message)
}

pub fn on_savings_goal(ctx: &ShellContext, goal: Money, description: &str) -> FinanceResult<String> {
    let progress = SavingsProgress::new(ctx.session.current_savings()?, goal, description)?;
    Ok(progress
        .format_terminal(&ctx.settings.currency_symbol)
        .trim_end()
        .to_string())
}

pub fn on_export(ctx: &ShellContext, target: &ExportCommand) -> FinanceResult<String> {
    let (username, id) = match ctx.session.active() {
        Some(active) => (active.username.as_str(), active.id),
        None => return Err(FinanceError::no_active_session()),
    };
    let record = ctx.session.record()?;

    let (message, detail) = match target {
        ExportCommand::Csv { dir } => {
            let written = export_record_csv(record, dir)?;
            (
                format!("Exported {} CSV files to {}", written.len(), dir.display()),
                format!("csv -> {}", dir.display()),
            )
        }
        ExportCommand::Json { file } => {
            let mut writer = BufWriter::new(create_export_file(file)?);
            export_full_json(username, record, &mut writer, true)?;
            (
                format!("Exported record to {}", file.display()),
                format!("json -> {}", file.display()),
            )
        }
        ExportCommand::Yaml { file } => {
            let mut writer = BufWriter::new(create_export_file(file)?);
            export_full_yaml(username, record, &mut writer)?;
            (
                format!("Exported record to {}", file.display()),
                format!("yaml -> {}", file.display()),
            )
        }
    };

    record_audit(
        ctx,
        &AuditEntry::new(Operation::Export, EntityType::Store, username)
            .with_session(id)
            .with_detail(detail),
    );
    info!(username, "exported record");
    Ok(message)
}

fn create_export_file(path: &Path) -> FinanceResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| FinanceError::Export(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    File::create(path)
        .map_err(|e| FinanceError::Export(format!("Failed to create {}: {}", path.display(), e)))
}
