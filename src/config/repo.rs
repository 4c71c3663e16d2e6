use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::worktree::GitRepo;

use super::types::Settings;

/// Current on-disk schema of `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Per-repository configuration persisted in `.ccws/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    pub schema_version: u32,
    pub workspace_dir: String,
    pub sessions_dir: String,
    pub branch_prefix: String,
    pub default_base_branch: String,
    pub template_file: String,
}

/// On-disk shape tolerant of missing keys; gaps are filled from [`Settings`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialRepoConfig {
    schema_version: Option<u32>,
    workspace_dir: Option<String>,
    sessions_dir: Option<String>,
    branch_prefix: Option<String>,
    default_base_branch: Option<String>,
    template_file: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RepoConfig {
    /// Fresh configuration as written by `init`.
    pub fn initial(settings: &Settings, default_base_branch: impl Into<String>) -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            workspace_dir: settings.workspace_dir.clone(),
            sessions_dir: settings.sessions_dir.clone(),
            branch_prefix: settings.branch_prefix.clone(),
            default_base_branch: default_base_branch.into(),
            template_file: settings.template_file.clone(),
        }
    }

    /// Load the repository configuration.
    ///
    /// Fails with `NotInitialized` when the file is absent. A missing
    /// `defaultBaseBranch` is re-detected from the repository.
    pub fn load(git: &GitRepo, settings: &Settings) -> Result<Self> {
        let path = settings.config_path(git.root());
        if !path.exists() {
            return Err(Error::NotInitialized { config_path: path });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
        let partial = Self::parse_partial(&content, &path)?;

        let default_base_branch = match non_empty(partial.default_base_branch) {
            Some(branch) => branch,
            None => git.detect_default_base()?,
        };

        Ok(Self {
            schema_version: partial.schema_version.unwrap_or(CONFIG_SCHEMA_VERSION),
            workspace_dir: non_empty(partial.workspace_dir)
                .unwrap_or_else(|| settings.workspace_dir.clone()),
            sessions_dir: non_empty(partial.sessions_dir)
                .unwrap_or_else(|| settings.sessions_dir.clone()),
            branch_prefix: partial
                .branch_prefix
                .unwrap_or_else(|| settings.branch_prefix.clone()),
            default_base_branch,
            template_file: non_empty(partial.template_file)
                .unwrap_or_else(|| settings.template_file.clone()),
        })
    }

    fn parse_partial(content: &str, path: &Path) -> Result<PartialRepoConfig> {
        serde_json::from_str(content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the configuration as pretty JSON with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn workspace_root(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.workspace_dir)
    }

    pub fn sessions_root(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.sessions_dir)
    }

    pub fn template_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.template_file)
    }

    /// Worktree location for a normalized session name.
    pub fn worktree_path(&self, repo_root: &Path, name: &str) -> PathBuf {
        self.workspace_root(repo_root).join(name)
    }
}

/// Serialize `value` as pretty JSON plus newline, replacing the file
/// atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value).map_err(|e| {
        Error::io(
            format!("failed to serialize {}", path.display()),
            e.into(),
        )
    })?;
    body.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)
        .map_err(|e| Error::io(format!("failed to write {}", tmp.display()), e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::io(format!("failed to write {}", path.display()), e)
    })
}
