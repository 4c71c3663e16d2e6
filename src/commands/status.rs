use ccws::color;
use ccws::config::Settings;
use ccws::error::Result;
use ccws::session::status_report;
use ccws::workspace::Workspace;

use super::{current_dir, warn_line};

/// List managed worktrees joined with their session records.
pub fn cmd_status(settings: &Settings) -> Result<()> {
    let ws = Workspace::open(&current_dir()?, settings)?;
    let report = status_report(&ws)?;

    for message in &report.malformed {
        warn_line(message);
    }

    println!("{} {}", color::label("Repo:"), ws.root().display());
    if report.rows.is_empty() {
        println!("No managed worktrees found.");
    }
    for row in &report.rows {
        println!(
            "- {} | {} | {} | {}",
            color::label(&row.name),
            row.branch.as_deref().unwrap_or("-"),
            ws.relative(&row.path),
            row.created_at.as_deref().unwrap_or("-")
        );
    }

    if !report.stale.is_empty() {
        println!();
        println!("{}", color::warning("Stale records:"));
        for record in &report.stale {
            println!(
                "- {} | {} | {} | missing",
                record.name,
                record.branch,
                ws.relative(&record.worktree_path)
            );
        }
    }
    Ok(())
}
