//! Test utilities for ccws.
//!
//! Throwaway git repositories for tests that exercise the git adapter and
//! the session lifecycle end to end.

#[cfg(test)]
use std::fs;
#[cfg(test)]
use std::path::Path;
#[cfg(test)]
use std::process::{Command, Output};

#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
use crate::config::Settings;
#[cfg(test)]
use crate::workspace::{init_repository, Workspace};

/// Run git in `dir`, panicking with its output on failure.
#[cfg(test)]
pub fn run_git(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run git command");
    assert!(
        output.status.success(),
        "git -C {} {:?} failed\nstdout:\n{}\nstderr:\n{}",
        dir.display(),
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Initialize a repository on `main` with one commit.
#[cfg(test)]
pub fn init_repo(dir: &Path) {
    run_git(dir, &["init"]);
    run_git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(dir, &["config", "user.name", "Ccws Test"]);
    run_git(dir, &["config", "user.email", "ccws-test@example.com"]);
    fs::write(dir.join("README.md"), "init").expect("write readme");
    run_git(dir, &["add", "."]);
    run_git(dir, &["commit", "-m", "initial"]);
}

/// A committed repository with `ccws init` already applied.
#[cfg(test)]
pub struct Fixture {
    pub temp: TempDir,
    pub settings: Settings,
}

#[cfg(test)]
impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp directory");
        init_repo(temp.path());
        let settings = Settings::default();
        init_repository(temp.path(), &settings, false).expect("init repository");
        Self { temp, settings }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::open(self.temp.path(), &self.settings).expect("open workspace")
    }
}
