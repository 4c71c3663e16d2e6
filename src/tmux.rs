//! Terminal multiplexer adapter.
//!
//! Sessions are launched by running a short plan of [`TmuxStep`]s. The plan
//! is plain data so dry-run output and tests can inspect it without a tmux
//! server.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::process::Runner;

/// One multiplexer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxStep {
    /// Detached session with its first pane rooted at `cwd`.
    NewSession {
        session: String,
        cwd: PathBuf,
        command: String,
    },
    /// Extra pane in `target` rooted at `cwd`.
    SplitWindow {
        target: String,
        cwd: PathBuf,
        command: String,
    },
    /// Even tiled layout for every pane in `target`.
    SelectLayoutTiled { target: String },
}

impl TmuxStep {
    /// Arguments passed to the tmux binary.
    pub fn args(&self) -> Vec<String> {
        match self {
            TmuxStep::NewSession {
                session,
                cwd,
                command,
            } => vec![
                "new-session".to_string(),
                "-d".to_string(),
                "-s".to_string(),
                session.clone(),
                "-c".to_string(),
                cwd.display().to_string(),
                command.clone(),
            ],
            TmuxStep::SplitWindow {
                target,
                cwd,
                command,
            } => vec![
                "split-window".to_string(),
                "-t".to_string(),
                target.clone(),
                "-c".to_string(),
                cwd.display().to_string(),
                command.clone(),
            ],
            TmuxStep::SelectLayoutTiled { target } => vec![
                "select-layout".to_string(),
                "-t".to_string(),
                target.clone(),
                "tiled".to_string(),
            ],
        }
    }

    /// Shell-style rendering with quoted path and command.
    pub fn describe(&self, bin: &str) -> String {
        match self {
            TmuxStep::NewSession {
                session,
                cwd,
                command,
            } => format!(
                "{} new-session -d -s {} -c \"{}\" \"{}\"",
                bin,
                session,
                cwd.display(),
                command
            ),
            TmuxStep::SplitWindow {
                target,
                cwd,
                command,
            } => format!(
                "{} split-window -t {} -c \"{}\" \"{}\"",
                bin,
                target,
                cwd.display(),
                command
            ),
            TmuxStep::SelectLayoutTiled { target } => {
                format!("{} select-layout -t {} tiled", bin, target)
            }
        }
    }
}

/// Operations needed from a terminal multiplexer.
pub trait Multiplexer {
    fn is_available(&self) -> bool;
    fn has_session(&self, name: &str) -> Result<bool>;
    fn run(&self, step: &TmuxStep) -> Result<()>;
    fn describe(&self, step: &TmuxStep) -> String {
        step.describe("tmux")
    }
}

/// tmux driven through its command line.
#[derive(Debug, Clone)]
pub struct Tmux {
    runner: Runner,
    bin: String,
}

impl Tmux {
    pub fn new(settings: &Settings) -> Self {
        Self {
            runner: settings.runner(),
            bin: settings.tmux_bin.clone(),
        }
    }
}

impl Multiplexer for Tmux {
    fn is_available(&self) -> bool {
        self.runner.is_available(&self.bin, &["-V"])
    }

    fn has_session(&self, name: &str) -> Result<bool> {
        let target = format!("={}", name);
        let output = self.runner.run(&self.bin, &["has-session", "-t", &target], None)?;
        Ok(output.success)
    }

    fn run(&self, step: &TmuxStep) -> Result<()> {
        let args = step.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner.run_checked(&self.bin, &args, None)?;
        Ok(())
    }

    fn describe(&self, step: &TmuxStep) -> String {
        step.describe(&self.bin)
    }
}

/// Pane target for the current window of `session`, whatever its index.
pub fn window_target(session: &str) -> String {
    format!("{}:", session)
}

/// Plan for one detached session.
pub fn plan_single(session: &str, cwd: &Path, command: &str) -> Vec<TmuxStep> {
    vec![TmuxStep::NewSession {
        session: session.to_string(),
        cwd: cwd.to_path_buf(),
        command: command.to_string(),
    }]
}

/// Plan for one window with a pane per worktree, tiled when there is more
/// than one.
pub fn plan_squad(session: &str, cwds: &[PathBuf], command: &str) -> Vec<TmuxStep> {
    let Some((first, rest)) = cwds.split_first() else {
        return Vec::new();
    };
    let target = window_target(session);

    let mut steps = plan_single(session, first, command);
    for cwd in rest {
        steps.push(TmuxStep::SplitWindow {
            target: target.clone(),
            cwd: cwd.clone(),
            command: command.to_string(),
        });
    }
    if !rest.is_empty() {
        steps.push(TmuxStep::SelectLayoutTiled { target });
    }
    steps
}

/// Fail unless the multiplexer is installed and `session` is free.
pub fn ensure_ready(mux: &dyn Multiplexer, session: &str) -> Result<()> {
    if !mux.is_available() {
        return Err(Error::MultiplexerUnavailable);
    }
    if mux.has_session(session)? {
        return Err(Error::MultiplexerSessionExists(session.to_string()));
    }
    Ok(())
}

/// Execute a plan in order, stopping at the first failure.
pub fn launch(mux: &dyn Multiplexer, steps: &[TmuxStep]) -> Result<()> {
    for step in steps {
        debug!(step = %mux.describe(step), "tmux step");
        mux.run(step)?;
    }
    if let Some(TmuxStep::NewSession { session, .. }) = steps.first() {
        let panes = steps
            .iter()
            .filter(|s| !matches!(s, TmuxStep::SelectLayoutTiled { .. }))
            .count();
        info!(event = "tmux.session_started", session = %session, panes);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Records steps instead of talking to tmux.
    #[derive(Default)]
    pub(crate) struct RecordingMux {
        pub unavailable: bool,
        pub existing: HashSet<String>,
        pub fail_on_run: bool,
        pub ran: RefCell<Vec<TmuxStep>>,
    }

    impl Multiplexer for RecordingMux {
        fn is_available(&self) -> bool {
            !self.unavailable
        }

        fn has_session(&self, name: &str) -> Result<bool> {
            Ok(self.existing.contains(name))
        }

        fn run(&self, step: &TmuxStep) -> Result<()> {
            if self.fail_on_run {
                return Err(Error::SubprocessFailed {
                    command: self.describe(step),
                    detail: "no server".to_string(),
                });
            }
            self.ran.borrow_mut().push(step.clone());
            Ok(())
        }
    }

    #[test]
    fn test_plan_single_session() {
        let steps = plan_single("api", Path::new("/r/w/api"), "claude");
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].describe("tmux"),
            "tmux new-session -d -s api -c \"/r/w/api\" \"claude\""
        );
        assert_eq!(
            steps[0].args(),
            vec!["new-session", "-d", "-s", "api", "-c", "/r/w/api", "claude"]
        );
    }

    #[test]
    fn test_plan_squad_tiles_multiple_panes() {
        let cwds = vec![PathBuf::from("/w/a"), PathBuf::from("/w/b"), PathBuf::from("/w/c")];
        let steps = plan_squad("sprint", &cwds, "claude");
        assert_eq!(steps.len(), 4);
        assert!(matches!(&steps[0], TmuxStep::NewSession { session, .. } if session == "sprint"));
        assert_eq!(
            steps[1].describe("tmux"),
            "tmux split-window -t sprint: -c \"/w/b\" \"claude\""
        );
        assert_eq!(steps[3].describe("tmux"), "tmux select-layout -t sprint: tiled");
        assert_eq!(window_target("sprint"), "sprint:");
    }

    #[test]
    fn test_plan_squad_single_pane_skips_layout() {
        let steps = plan_squad("solo", &[PathBuf::from("/w/a")], "claude");
        assert_eq!(steps.len(), 1);
        assert!(plan_squad("none", &[], "claude").is_empty());
    }

    #[test]
    fn test_ensure_ready_errors() {
        let mux = RecordingMux {
            unavailable: true,
            ..Default::default()
        };
        assert!(matches!(
            ensure_ready(&mux, "x"),
            Err(Error::MultiplexerUnavailable)
        ));

        let mut existing = HashSet::new();
        existing.insert("taken".to_string());
        let mux = RecordingMux {
            existing,
            ..Default::default()
        };
        assert!(matches!(
            ensure_ready(&mux, "taken"),
            Err(Error::MultiplexerSessionExists(ref s)) if s == "taken"
        ));
        ensure_ready(&mux, "free").expect("free session");
    }

    #[test]
    fn test_launch_runs_steps_in_order() {
        let mux = RecordingMux::default();
        let steps = plan_squad("s", &[PathBuf::from("/a"), PathBuf::from("/b")], "codex");
        launch(&mux, &steps).expect("launch");
        assert_eq!(*mux.ran.borrow(), steps);
    }
}
