//! An initialized repository: git handle, repository config and settings.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{RepoConfig, Settings};
use crate::error::{Error, Result};
use crate::lock::RepoLock;
use crate::session::SessionStore;
use crate::worktree::GitRepo;

/// Everything a session operation needs to know about the repository.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub git: GitRepo,
    pub config: RepoConfig,
    pub settings: Settings,
}

impl Workspace {
    /// Discover the repository around `cwd` and load its configuration.
    pub fn open(cwd: &Path, settings: &Settings) -> Result<Self> {
        let git = GitRepo::discover(cwd, settings)?;
        let config = RepoConfig::load(&git, settings)?;
        Ok(Self {
            git,
            config,
            settings: settings.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        self.git.root()
    }

    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.config.sessions_root(self.root()))
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.config.workspace_root(self.root())
    }

    pub fn worktree_path(&self, name: &str) -> PathBuf {
        self.config.worktree_path(self.root(), name)
    }

    pub fn template_path(&self) -> PathBuf {
        self.config.template_path(self.root())
    }

    /// Exclusive lock for mutating operations.
    pub fn lock(&self) -> Result<RepoLock> {
        RepoLock::acquire(&self.settings.lock_path(self.root()))
    }

    /// `path` relative to the repository root, `.` for the root itself.
    pub fn relative(&self, path: &Path) -> String {
        relative_to(self.root(), path)
    }
}

pub(crate) fn relative_to(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Result of `init`.
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub repo_root: PathBuf,
    pub config_path: PathBuf,
    pub config: RepoConfig,
    pub template_written: bool,
}

/// Create the tool directory, config, template and session directories.
pub fn init_repository(cwd: &Path, settings: &Settings, force: bool) -> Result<InitOutcome> {
    let git = GitRepo::discover(cwd, settings)?;
    let root = git.root().to_path_buf();
    let config_path = settings.config_path(&root);
    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized { config_path });
    }

    let _lock = RepoLock::acquire(&settings.lock_path(&root))?;

    let default_base = git.detect_default_base()?;
    let config = RepoConfig::initial(settings, default_base);

    for dir in [
        settings.tool_dir_in(&root),
        config.workspace_root(&root),
        config.sessions_root(&root),
    ] {
        fs::create_dir_all(&dir)
            .map_err(|e| Error::io(format!("failed to create {}", dir.display()), e))?;
    }

    config.save(&config_path)?;

    let template_path = config.template_path(&root);
    let template_written = force || !template_path.exists();
    if template_written {
        fs::write(&template_path, &settings.default_template).map_err(|e| {
            Error::io(format!("failed to write {}", template_path.display()), e)
        })?;
    }

    info!(
        event = "repo.initialized",
        root = %root.display(),
        base = %config.default_base_branch
    );

    Ok(InitOutcome {
        repo_root: root,
        config_path,
        config,
        template_written,
    })
}
