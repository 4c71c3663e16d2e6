use ccws::color;
use ccws::config::{Settings, SpawnArgs};
use ccws::error::Result;
use ccws::session::{create_session, CreateOptions};
use ccws::tmux::{self, Multiplexer, Tmux};
use ccws::workspace::Workspace;

use super::{current_dir, dry_run_line};

/// Create one session, optionally launching tmux in it.
pub fn cmd_spawn(settings: &Settings, args: &SpawnArgs) -> Result<()> {
    let ws = Workspace::open(&current_dir()?, settings)?;
    let mux = Tmux::new(settings);
    let agent_command = args
        .tmux_cmd
        .clone()
        .unwrap_or_else(|| settings.agent_command.clone());

    let opts = CreateOptions {
        base_branch: args.base.clone(),
        branch: args.branch.clone(),
        dry_run: true,
    };
    let planned = create_session(&ws, &args.name, &opts)?;

    if args.dry_run {
        dry_run_line(&ws.git.describe_add_worktree(
            &planned.branch,
            &planned.worktree_path,
            &planned.base_branch,
        ));
        if args.tmux {
            for step in tmux::plan_single(&planned.name, &planned.worktree_path, &agent_command) {
                dry_run_line(&mux.describe(&step));
            }
        }
        return Ok(());
    }

    if args.tmux {
        tmux::ensure_ready(&mux, &planned.name)?;
    }

    let session = create_session(
        &ws,
        &args.name,
        &CreateOptions {
            dry_run: false,
            ..opts
        },
    )?;

    println!("{}", color::success("Session created."));
    println!("- Name: {}", color::label(&session.name));
    println!("- Branch: {}", session.branch);
    println!("- Base: {}", session.base_branch);
    println!("- Worktree: {}", session.worktree_path.display());

    if args.tmux {
        let steps = tmux::plan_single(&session.name, &session.worktree_path, &agent_command);
        tmux::launch(&mux, &steps)?;
        println!("- tmux: launched session \"{}\"", session.name);
    }

    println!();
    println!("{}", color::label("Next:"));
    if args.tmux {
        println!("tmux attach -t {}", session.name);
    } else {
        println!("cd \"{}\"", session.worktree_path.display());
        println!("{}", agent_command);
        println!();
        println!("tmux optional:");
        println!(
            "tmux new -s {} -c \"{}\" \"{}\"",
            session.name,
            session.worktree_path.display(),
            agent_command
        );
    }
    Ok(())
}
