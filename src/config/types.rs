use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::process::Runner;
use crate::template::DEFAULT_TEMPLATE;

use super::env;

/// Default subprocess timeout in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Default number of changed paths listed per session in a standup.
pub const DEFAULT_STANDUP_FILES: usize = 3;

/// Process-wide defaults for ccws.
///
/// Built once at startup (see [`Settings::load`]) and passed by reference to
/// every operation. Nothing in the crate reads these values from globals.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Tool directory relative to the repository root.
    pub tool_dir: PathBuf,
    /// Repository configuration file relative to the repository root.
    pub config_file: PathBuf,
    /// Session brief template relative to the repository root.
    pub template_file: String,
    /// Default workspace directory written by `init`.
    pub workspace_dir: String,
    /// Default sessions directory written by `init`.
    pub sessions_dir: String,
    /// Default branch prefix written by `init`.
    pub branch_prefix: String,
    /// Command launched in multiplexer panes.
    pub agent_command: String,
    /// Changed paths shown per session in a standup.
    pub standup_files: usize,
    /// Subprocess timeout in seconds (0 disables the timeout).
    pub command_timeout_secs: u64,
    /// Version-control program.
    pub git_bin: String,
    /// Terminal multiplexer program.
    pub tmux_bin: String,
    /// Brief template used when the repository has none.
    pub default_template: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool_dir: PathBuf::from(".ccws"),
            config_file: PathBuf::from(".ccws/config.json"),
            template_file: ".ccws/session-template.md".to_string(),
            workspace_dir: ".ccws/worktrees".to_string(),
            sessions_dir: ".ccws/sessions".to_string(),
            branch_prefix: "codex/".to_string(),
            agent_command: "claude".to_string(),
            standup_files: DEFAULT_STANDUP_FILES,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            git_bin: "git".to_string(),
            tmux_bin: "tmux".to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn load() -> Self {
        let mut settings = Self::default();
        env::apply_env(&mut settings);
        settings
    }

    /// Timeout applied to every subprocess, if any.
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Subprocess runner configured with this timeout.
    pub fn runner(&self) -> Runner {
        Runner::new(self.command_timeout())
    }

    pub fn tool_dir_in(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.tool_dir)
    }

    pub fn config_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.config_file)
    }

    /// Advisory lock file held during mutating operations.
    pub fn lock_path(&self, repo_root: &Path) -> PathBuf {
        self.tool_dir_in(repo_root).join("ccws.lock")
    }
}
