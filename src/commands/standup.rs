use ccws::color;
use ccws::config::{Settings, StandupArgs};
use ccws::error::Result;
use ccws::naming::iso_timestamp;
use ccws::standup::{standup_report, SessionState};
use ccws::workspace::Workspace;

use super::current_dir;

/// Print a change summary for every recorded session.
pub fn cmd_standup(settings: &Settings, args: &StandupArgs) -> Result<()> {
    let ws = Workspace::open(&current_dir()?, settings)?;
    let max_files = args.files.unwrap_or(settings.standup_files);
    let summaries = standup_report(&ws, max_files)?;

    if summaries.is_empty() {
        println!("No sessions found. Create one with `ccws spawn <name>` first.");
        return Ok(());
    }

    println!("{}", color::label(&format!("Standup Report ({})", iso_timestamp())));
    println!("Repo: {}", ws.root().display());
    println!("Sessions: {}", color::number(summaries.len()));

    for summary in &summaries {
        let record = &summary.record;
        println!();
        println!(
            "{}",
            color::label(&format!("## {} ({})", record.name, record.branch))
        );
        println!("Path: {}", ws.relative(&record.worktree_path));

        match &summary.state {
            SessionState::Missing => {
                println!("State: {}", color::warning("missing worktree path"));
            }
            SessionState::Error(message) => {
                println!("State: {}", color::error(&format!("error ({})", message)));
            }
            SessionState::Active {
                last_commit,
                changes,
            } => {
                println!("Last commit: {}", last_commit.as_deref().unwrap_or("-"));
                if changes.is_clean() {
                    println!("Changes: {}", color::success("clean"));
                    continue;
                }
                println!(
                    "Changes: {} files (staged {}, unstaged {}, untracked {})",
                    changes.total_changes(),
                    changes.staged,
                    changes.unstaged,
                    changes.untracked
                );
                if !summary.top_files.is_empty() {
                    println!("Top files: {}", summary.top_files.join(", "));
                }
            }
        }
    }
    Ok(())
}
