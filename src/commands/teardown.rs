use ccws::color;
use ccws::config::{Settings, TeardownArgs};
use ccws::error::Result;
use ccws::session::{teardown_session, TeardownOptions};
use ccws::workspace::Workspace;

use super::{current_dir, dry_run_line, warn_line};

/// Remove a session's worktree, record and optionally its branch.
pub fn cmd_teardown(settings: &Settings, args: &TeardownArgs) -> Result<()> {
    let ws = Workspace::open(&current_dir()?, settings)?;
    let opts = TeardownOptions {
        delete_branch: args.delete_branch,
        forced: args.forced(),
        dry_run: args.dry_run,
    };

    let outcome = teardown_session(&ws, &args.name, &opts)?;

    for warning in &outcome.warnings {
        warn_line(warning);
    }

    if outcome.dry_run {
        for command in &outcome.commands {
            dry_run_line(command);
        }
        return Ok(());
    }

    println!(
        "{}",
        color::success(&format!("Session removed: {}", outcome.name))
    );
    println!("- Worktree: {}", outcome.worktree_path.display());
    if outcome.branch_deleted {
        if let Some(branch) = &outcome.branch {
            println!("- Branch deleted: {}", branch);
        }
    }
    Ok(())
}
