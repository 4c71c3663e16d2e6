use ccws::color;
use ccws::config::{InitArgs, Settings};
use ccws::error::Result;
use ccws::workspace::init_repository;

use super::current_dir;

/// Initialize `.ccws/` in the current repository.
pub fn cmd_init(settings: &Settings, args: &InitArgs) -> Result<()> {
    let outcome = init_repository(&current_dir()?, settings, args.force)?;

    println!("{}", color::success("Initialized cc-worktree-squad."));
    println!("- Repo: {}", outcome.repo_root.display());
    println!("- Base branch: {}", color::info(&outcome.config.default_base_branch));
    println!("- Config: {}", outcome.config_path.display());
    if !outcome.template_written {
        println!("- Template: kept existing {}", outcome.config.template_file);
    }
    Ok(())
}
