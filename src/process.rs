//! Subprocess execution with a bounded wait.
//!
//! Every git and tmux invocation goes through [`Runner`]. Children are
//! spawned in their own process group so a timed-out command can be torn
//! down together with anything it forked.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stderr, falling back to stdout, for error messages.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Render a command line for logs, dry-run output and errors.
pub fn describe(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Runs external programs with an optional timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runner {
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `program` with `args` and capture its output.
    ///
    /// A non-zero exit is not an error here; callers decide what a failure
    /// means. Spawn failures and timeouts are errors.
    pub fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let line = describe(program, args);
        debug!(command = %line, cwd = ?cwd, "running subprocess");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = spawn_in_new_process_group(&mut cmd).map_err(|e| {
            Error::SubprocessFailed {
                command: line.clone(),
                detail: format!("failed to spawn: {}", e),
            }
        })?;

        let stdout_handle = drain(child.stdout.take());
        let stderr_handle = drain(child.stderr.take());

        let status = match self.wait(&mut child, &line) {
            Ok(status) => status,
            Err(err) => {
                let _ = stdout_handle.join();
                let _ = stderr_handle.join();
                return Err(err);
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();
        debug!(command = %line, status = ?status.code(), "subprocess finished");

        Ok(CommandOutput {
            status: status.code(),
            success: status.success(),
            stdout,
            stderr,
        })
    }

    /// Run and fail with `SubprocessFailed` on a non-zero exit.
    pub fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        let output = self.run(program, args, cwd)?;
        if output.success {
            Ok(output)
        } else {
            Err(Error::SubprocessFailed {
                command: describe(program, args),
                detail: output.diagnostic(),
            })
        }
    }

    /// True when `program probe_args...` can be spawned and exits cleanly.
    pub fn is_available(&self, program: &str, probe_args: &[&str]) -> bool {
        matches!(self.run(program, probe_args, None), Ok(out) if out.success)
    }

    fn wait(&self, child: &mut Child, line: &str) -> Result<std::process::ExitStatus> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if let Some(limit) = self.timeout {
                        if start.elapsed() >= limit {
                            warn!(command = %line, secs = limit.as_secs(), "subprocess timed out");
                            kill_process_tree(child.id());
                            let _ = child.wait();
                            return Err(Error::CommandTimedOut {
                                command: line.to_string(),
                                secs: limit.as_secs(),
                            });
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    kill_process_tree(child.id());
                    let _ = child.wait();
                    return Err(Error::io(format!("failed to wait for {}", line), e));
                }
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Spawn a command in a new process group when supported.
#[cfg(unix)]
fn spawn_in_new_process_group(cmd: &mut Command) -> io::Result<Child> {
    use std::os::unix::process::CommandExt;

    unsafe {
        cmd.pre_exec(|| {
            libc::setpgid(0, 0);
            Ok(())
        });
    }

    cmd.spawn()
}

#[cfg(windows)]
fn spawn_in_new_process_group(cmd: &mut Command) -> io::Result<Child> {
    cmd.spawn()
}

/// Kill a process and its process group: SIGTERM, short grace, SIGKILL.
#[cfg(unix)]
pub fn kill_process_tree(pid: u32) {
    let pgid = -(pid as i32);

    unsafe {
        libc::kill(pgid, libc::SIGTERM);
    }

    thread::sleep(POLL_INTERVAL);

    unsafe {
        libc::kill(pgid, libc::SIGKILL);
    }
}

#[cfg(windows)]
pub fn kill_process_tree(pid: u32) {
    let _ = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .status();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_joins_args() {
        assert_eq!(
            describe("git", &["worktree", "remove", "--force", "/repo/x"]),
            "git worktree remove --force /repo/x"
        );
        assert_eq!(describe("tmux", &[]), "tmux");
    }

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let out = CommandOutput {
            status: Some(128),
            success: false,
            stdout: "ignored\n".to_string(),
            stderr: "  fatal: bad ref \n".to_string(),
        };
        assert_eq!(out.diagnostic(), "fatal: bad ref");

        let out = CommandOutput {
            status: Some(2),
            success: false,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(out.diagnostic(), "exit status 2");
    }

    #[test]
    fn test_spawn_failure_is_subprocess_error() {
        let runner = Runner::new(Some(Duration::from_secs(5)));
        let err = runner
            .run("ccws-definitely-not-a-program", &[], None)
            .unwrap_err();
        assert!(matches!(err, Error::SubprocessFailed { .. }), "{:?}", err);
        assert!(!runner.is_available("ccws-definitely-not-a-program", &["-V"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_output_and_status() {
        let runner = Runner::new(Some(Duration::from_secs(5)));
        let out = runner
            .run("sh", &["-c", "echo out; echo err >&2; exit 3"], None)
            .expect("run sh");
        assert_eq!(out.status, Some(3));
        assert!(!out.success);
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");

        let err = runner
            .run_checked("sh", &["-c", "echo boom >&2; exit 1"], None)
            .unwrap_err();
        match err {
            Error::SubprocessFailed { detail, .. } => assert_eq!(detail, "boom"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_honors_cwd() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let runner = Runner::new(None);
        let out = runner
            .run_checked("pwd", &[], Some(temp.path()))
            .expect("run pwd");
        let reported = std::fs::canonicalize(out.stdout.trim()).expect("canonicalize");
        let expected = std::fs::canonicalize(temp.path()).expect("canonicalize");
        assert_eq!(reported, expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process_group() {
        let runner = Runner::new(Some(Duration::from_millis(300)));
        let start = Instant::now();
        let err = runner.run("sh", &["-c", "sleep 10 & sleep 10"], None).unwrap_err();
        assert!(matches!(err, Error::CommandTimedOut { .. }), "{:?}", err);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_creates_new_process_group() {
        let mut cmd = Command::new("sleep");
        cmd.arg("10")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = spawn_in_new_process_group(&mut cmd).expect("spawn sleep");
        let pid = child.id() as i32;

        let pgid = unsafe { libc::getpgid(pid) };
        assert_eq!(pgid, pid);

        kill_process_tree(child.id());
        let _ = child.wait();
    }
}
