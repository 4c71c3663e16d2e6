//! Error taxonomy shared by every ccws operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not inside a Git repository: {}", .cwd.display())]
    NotARepository { cwd: PathBuf },

    #[error("Not initialized. Run `ccws init` first (expected config: {}).", .config_path.display())]
    NotInitialized { config_path: PathBuf },

    #[error("Already initialized at {}. Use --force if you want to overwrite.", .config_path.display())]
    AlreadyInitialized { config_path: PathBuf },

    #[error("Could not determine a default base branch.")]
    NoDefaultBranch,

    #[error("Invalid session name: {0:?}")]
    InvalidName(String),

    #[error("At least one session name is required. Example: ccws squad api ui")]
    NoSessionNames,

    #[error("Session names must be unique in squad mode: {0} appears more than once.")]
    DuplicateSessionName(String),

    #[error("`--branch` is only supported with one squad session.")]
    AmbiguousBranchOverride,

    #[error("Branch already exists: {0}")]
    BranchAlreadyExists(String),

    #[error("Base branch not found locally or on origin: {0}")]
    BaseBranchNotFound(String),

    #[error("Worktree path already exists: {}", .0.display())]
    WorktreePathExists(PathBuf),

    #[error("Worktree does not exist: {}", .0.display())]
    WorktreeNotFound(PathBuf),

    #[error("git worktree add failed for {}: {detail}", .path.display())]
    WorktreeCreationFailed { path: PathBuf, detail: String },

    #[error("tmux is not installed. Install tmux first or drop the tmux option.")]
    MultiplexerUnavailable,

    #[error("tmux session already exists: {0}")]
    MultiplexerSessionExists(String),

    #[error("Command failed: {command}: {detail}")]
    SubprocessFailed { command: String, detail: String },

    #[error("Command timed out after {secs}s: {command}")]
    CommandTimedOut { command: String, secs: u64 },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed session record {}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
