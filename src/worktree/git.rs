use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::process::{describe, CommandOutput, Runner};

use super::list::{parse_worktree_porcelain, WorktreeEntry};
use super::status::{parse_status_porcelain, StatusSummary};

const REMOTE: &str = "origin";

/// Handle on one git repository. Every call shells out to git with `-C`.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
    runner: Runner,
    git_bin: String,
}

impl GitRepo {
    /// Locate the repository containing `cwd`.
    pub fn discover(cwd: &Path, settings: &Settings) -> Result<Self> {
        let runner = settings.runner();
        let output = runner.run(&settings.git_bin, &["rev-parse", "--show-toplevel"], Some(cwd))?;
        let root = output.stdout.trim();
        if !output.success || root.is_empty() {
            return Err(Error::NotARepository {
                cwd: cwd.to_path_buf(),
            });
        }
        Ok(Self::open(PathBuf::from(root), settings))
    }

    /// Wrap a known repository root without probing it.
    pub fn open(root: PathBuf, settings: &Settings) -> Self {
        Self {
            root,
            runner: settings.runner(),
            git_bin: settings.git_bin.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        let root = self.root.to_string_lossy();
        let mut full: Vec<&str> = vec!["-C", root.as_ref()];
        full.extend_from_slice(args);
        self.runner.run(&self.git_bin, &full, None)
    }

    fn git_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.git(args)?;
        if output.success {
            Ok(output)
        } else {
            Err(Error::SubprocessFailed {
                command: describe(&self.git_bin, args),
                detail: output.diagnostic(),
            })
        }
    }

    fn git_in(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run(&self.git_bin, args, Some(dir))
    }

    /// `show-ref --verify --quiet`: exit 1 means absent, other failures are errors.
    fn ref_exists(&self, ref_name: &str) -> Result<bool> {
        let args = ["show-ref", "--verify", "--quiet", ref_name];
        let output = self.git(&args)?;
        if output.success {
            return Ok(true);
        }
        match output.status {
            Some(1) => Ok(false),
            _ => Err(Error::SubprocessFailed {
                command: describe(&self.git_bin, &args),
                detail: output.diagnostic(),
            }),
        }
    }

    pub fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        self.ref_exists(&format!("refs/heads/{}", branch))
    }

    pub fn remote_branch_exists(&self, branch: &str) -> Result<bool> {
        self.ref_exists(&format!("refs/remotes/{}/{}", REMOTE, branch))
    }

    /// True when the branch exists locally or under `origin/`.
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.local_branch_exists(branch)? || self.remote_branch_exists(branch)?)
    }

    /// Default base: origin's HEAD, then `main`, then `master`, then the
    /// current branch.
    pub fn detect_default_base(&self) -> Result<String> {
        let origin_head = format!("refs/remotes/{}/HEAD", REMOTE);
        let output = self.git(&["symbolic-ref", "--quiet", "--short", &origin_head])?;
        if output.success {
            let short = output.stdout.trim();
            let prefix = format!("{}/", REMOTE);
            let branch = short.strip_prefix(&prefix).unwrap_or(short);
            if !branch.is_empty() {
                debug!(branch, "default base from remote HEAD");
                return Ok(branch.to_string());
            }
        }

        for candidate in ["main", "master"] {
            if self.local_branch_exists(candidate)? {
                return Ok(candidate.to_string());
            }
        }

        let output = self.git(&["branch", "--show-current"])?;
        let current = output.stdout.trim();
        if output.success && !current.is_empty() {
            return Ok(current.to_string());
        }

        Err(Error::NoDefaultBranch)
    }

    /// Non-mutating check that `branch` can serve as a base.
    pub fn check_base_exists(&self, branch: &str) -> Result<()> {
        if self.branch_exists(branch)? {
            Ok(())
        } else {
            Err(Error::BaseBranchNotFound(branch.to_string()))
        }
    }

    /// Make sure a local `branch` exists, creating it from `origin/<branch>`
    /// when only the remote one is present.
    pub fn ensure_base_exists(&self, branch: &str) -> Result<()> {
        if self.local_branch_exists(branch)? {
            return Ok(());
        }
        if !self.remote_branch_exists(branch)? {
            return Err(Error::BaseBranchNotFound(branch.to_string()));
        }
        let upstream = format!("{}/{}", REMOTE, branch);
        self.git_checked(&["branch", branch, &upstream])?;
        debug!(branch, upstream = %upstream, "created local base branch");
        Ok(())
    }

    fn add_worktree_args<'a>(branch: &'a str, path: &'a str, base: &'a str) -> [&'a str; 6] {
        ["worktree", "add", "-b", branch, path, base]
    }

    /// Create `branch` from `base` and check it out at `path`.
    pub fn add_worktree(&self, branch: &str, path: &Path, base: &str) -> Result<()> {
        let path_str = path.to_string_lossy();
        let output = self.git(&Self::add_worktree_args(branch, &path_str, base))?;
        if output.success {
            Ok(())
        } else {
            Err(Error::WorktreeCreationFailed {
                path: path.to_path_buf(),
                detail: output.diagnostic(),
            })
        }
    }

    fn remove_worktree_args(path: &str, forced: bool) -> Vec<&str> {
        let mut args = vec!["worktree", "remove"];
        if forced {
            args.push("--force");
        }
        args.push(path);
        args
    }

    pub fn remove_worktree(&self, path: &Path, forced: bool) -> Result<()> {
        let path_str = path.to_string_lossy();
        self.git_checked(&Self::remove_worktree_args(&path_str, forced))?;
        Ok(())
    }

    /// Force-delete a local branch.
    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        self.git_checked(&["branch", "-D", branch])?;
        Ok(())
    }

    pub fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>> {
        let output = self.git_checked(&["worktree", "list", "--porcelain"])?;
        Ok(parse_worktree_porcelain(&output.stdout))
    }

    /// Short status of the worktree at `path`.
    pub fn status(&self, path: &Path) -> Result<StatusSummary> {
        let args = ["status", "--porcelain"];
        let output = self.git_in(path, &args)?;
        if !output.success {
            return Err(Error::SubprocessFailed {
                command: describe(&self.git_bin, &args),
                detail: output.diagnostic(),
            });
        }
        Ok(parse_status_porcelain(&output.stdout))
    }

    /// `<short-hash> <relative-date> <subject>` of HEAD, if there is one.
    pub fn last_commit(&self, path: &Path) -> Result<Option<String>> {
        let output = self.git_in(path, &["log", "-1", "--pretty=format:%h %cr %s"])?;
        let line = output.stdout.trim();
        if output.success && !line.is_empty() {
            Ok(Some(line.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Command lines as they would run, for dry-run output.
    pub fn describe_add_worktree(&self, branch: &str, path: &Path, base: &str) -> String {
        let path_str = path.to_string_lossy();
        describe(&self.git_bin, &Self::add_worktree_args(branch, &path_str, base))
    }

    pub fn describe_remove_worktree(&self, path: &Path, forced: bool) -> String {
        let path_str = path.to_string_lossy();
        describe(&self.git_bin, &Self::remove_worktree_args(&path_str, forced))
    }

    pub fn describe_delete_branch(&self, branch: &str) -> String {
        describe(&self.git_bin, &["branch", "-D", branch])
    }
}
