use clap::{Args, Parser, Subcommand};

const AFTER_HELP: &str = "Notes:
  - Run commands from inside a Git repository.
  - Branch prefix defaults to \"codex/\".
  - Use --tmux to launch a detached tmux session automatically.
  - Use squad for one-command multi-worktree + multi-pane tmux boards.
  - Use standup for session-by-session change summaries.
  - teardown uses --force by default (use --safe to disable).
  - Set CCWS_LOG=debug to trace every git/tmux invocation.";

/// CLI arguments parsed from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "ccws",
    version,
    about = "cc-worktree-squad: parallel agent sessions on isolated git worktrees",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Subcommand to execute; prints help when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// ccws subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create .ccws/ with config, template, and session directories.
    Init(InitArgs),
    /// Create one session: branch + worktree + brief + record.
    Spawn(SpawnArgs),
    /// Create several sessions and tile them in one tmux window.
    #[command(alias = "board")]
    Squad(SquadArgs),
    /// List managed worktrees joined with their session records.
    #[command(alias = "list")]
    Status,
    /// Summarize live changes in every recorded session.
    Standup(StandupArgs),
    /// Remove a session's worktree and record.
    #[command(alias = "rm")]
    Teardown(TeardownArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct InitArgs {
    /// Overwrite an existing config and template.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SpawnArgs {
    /// Session name (normalized to [a-z0-9._-]).
    pub name: String,
    /// Base branch to fork from [default: config defaultBaseBranch].
    #[arg(long, value_name = "BRANCH")]
    pub base: Option<String>,
    /// Explicit branch name instead of <prefix><name>-<timestamp>.
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,
    /// Launch a detached tmux session in the new worktree.
    #[arg(long)]
    pub tmux: bool,
    /// Command to run inside tmux [default: claude].
    #[arg(long = "tmux-cmd", value_name = "COMMAND")]
    pub tmux_cmd: Option<String>,
    /// Print what would run without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SquadArgs {
    /// Session names, one pane each.
    pub names: Vec<String>,
    /// Base branch to fork from [default: config defaultBaseBranch].
    #[arg(long, value_name = "BRANCH")]
    pub base: Option<String>,
    /// Explicit branch name (only valid with a single session).
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,
    /// tmux session name [default: squad-<timestamp>].
    #[arg(long, value_name = "TMUX_NAME")]
    pub session: Option<String>,
    /// Command to run in each pane [default: claude].
    #[arg(long = "tmux-cmd", value_name = "COMMAND")]
    pub tmux_cmd: Option<String>,
    /// Print what would run without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct StandupArgs {
    /// Changed files listed per session [default: 3].
    #[arg(long, value_name = "COUNT")]
    pub files: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct TeardownArgs {
    /// Session name.
    pub name: String,
    /// Also delete the session branch.
    #[arg(long)]
    pub delete_branch: bool,
    /// Refuse to remove a worktree with local changes.
    #[arg(long)]
    pub safe: bool,
    /// Force removal even when --safe is given.
    #[arg(long)]
    pub force: bool,
    /// Print what would run without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl TeardownArgs {
    /// Teardown is destructive unless `--safe` is requested without `--force`.
    pub fn forced(&self) -> bool {
        self.force || !self.safe
    }
}

/// Parse CLI arguments from an iterator (program name first).
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
