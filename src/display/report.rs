//! Report formatting helpers

use crate::backup::BackupInfo;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format the backup listing, newest first
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let name_width = backups
        .iter()
        .map(|b| b.filename.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = format!(
        "{:<name_width$}  {:<23}  {:>10}\n",
        "Filename",
        "Created",
        "Size",
        name_width = name_width
    );
    output.push_str(&format!(
        "{:-<name_width$}  {:-<23}  {:->10}\n",
        "",
        "",
        "",
        name_width = name_width
    ));

    for backup in backups {
        output.push_str(&format!(
            "{:<name_width$}  {:<23}  {:>10}\n",
            backup.filename,
            backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format!("{} B", backup.size_bytes),
            name_width = name_width
        ));
    }

    output.trim_end().to_string()
}
