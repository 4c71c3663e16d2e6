use ccws::color;
use ccws::config::{Settings, SquadArgs};
use ccws::error::Result;
use ccws::squad::{create_squad, SquadOptions};
use ccws::tmux::{Multiplexer, Tmux};
use ccws::workspace::Workspace;

use super::{current_dir, dry_run_line};

/// Create several sessions and tile them in one tmux window.
pub fn cmd_squad(settings: &Settings, args: &SquadArgs) -> Result<()> {
    let ws = Workspace::open(&current_dir()?, settings)?;
    let mux = Tmux::new(settings);
    let opts = SquadOptions {
        base_branch: args.base.clone(),
        branch: args.branch.clone(),
        session_name: args.session.clone(),
        agent_command: args
            .tmux_cmd
            .clone()
            .unwrap_or_else(|| settings.agent_command.clone()),
        dry_run: args.dry_run,
    };

    let squad = create_squad(&ws, &args.names, &opts, &mux)?;

    if squad.dry_run {
        for session in &squad.sessions {
            dry_run_line(&ws.git.describe_add_worktree(
                &session.branch,
                &session.worktree_path,
                &session.base_branch,
            ));
        }
        for step in &squad.steps {
            dry_run_line(&mux.describe(step));
        }
        return Ok(());
    }

    println!("{}", color::success("Squad created."));
    println!("- tmux session: {}", color::label(&squad.session_name));
    for session in &squad.sessions {
        println!(
            "- {} | {} | {}",
            session.name,
            session.branch,
            session.worktree_path.display()
        );
    }
    println!();
    println!("{}", color::label("Next:"));
    println!("tmux attach -t {}", squad.session_name);
    Ok(())
}
