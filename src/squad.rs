//! Squads: several sessions created together and tiled in one tmux window.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};
use crate::naming::{normalize_session_name, timestamp_slug};
use crate::session::{create_session_unlocked, CreateOptions, SessionRecord};
use crate::tmux::{self, Multiplexer, TmuxStep};
use crate::workspace::Workspace;

/// Options for [`create_squad`].
#[derive(Debug, Clone, Default)]
pub struct SquadOptions {
    pub base_branch: Option<String>,
    /// Only valid with exactly one name.
    pub branch: Option<String>,
    /// Multiplexer session name; `squad-<slug>` when `None`.
    pub session_name: Option<String>,
    /// Command launched in each pane.
    pub agent_command: String,
    pub dry_run: bool,
}

/// Sessions created as one unit and the multiplexer plan that binds them.
#[derive(Debug, Clone)]
pub struct Squad {
    pub session_name: String,
    pub sessions: Vec<SessionRecord>,
    pub steps: Vec<TmuxStep>,
    pub dry_run: bool,
}

/// Normalized, de-duplicated squad member names.
///
/// Names that normalize to nothing are dropped; an empty result is an error.
pub fn validate_names(raw: &[String], branch: Option<&str>) -> Result<Vec<String>> {
    let names: Vec<String> = raw
        .iter()
        .map(|n| normalize_session_name(n))
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err(Error::NoSessionNames);
    }

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(Error::DuplicateSessionName(name.clone()));
        }
    }

    if branch.is_some() && names.len() > 1 {
        return Err(Error::AmbiguousBranchOverride);
    }
    Ok(names)
}

fn resolve_session_name(requested: Option<&str>) -> Result<String> {
    let raw = match requested {
        Some(name) => name.to_string(),
        None => format!("squad-{}", timestamp_slug()),
    };
    let name = normalize_session_name(&raw);
    if name.is_empty() {
        return Err(Error::InvalidName(raw));
    }
    Ok(name)
}

/// Create every member session, then launch one tiled multiplexer window.
///
/// All members and the multiplexer are validated before the first worktree
/// is created. A failure partway through the creation pass leaves sessions
/// already created in place.
pub fn create_squad(
    ws: &Workspace,
    raw_names: &[String],
    opts: &SquadOptions,
    mux: &dyn Multiplexer,
) -> Result<Squad> {
    let names = validate_names(raw_names, opts.branch.as_deref())?;
    let session_name = resolve_session_name(opts.session_name.as_deref())?;

    let member_opts = CreateOptions {
        base_branch: opts.base_branch.clone(),
        branch: opts.branch.clone(),
        dry_run: true,
    };
    let planned = names
        .iter()
        .map(|name| create_session_unlocked(ws, name, &member_opts))
        .collect::<Result<Vec<_>>>()?;

    if opts.dry_run {
        let steps = plan(&session_name, &planned, &opts.agent_command);
        return Ok(Squad {
            session_name,
            sessions: planned,
            steps,
            dry_run: true,
        });
    }

    tmux::ensure_ready(mux, &session_name)?;

    let _lock = ws.lock()?;
    let member_opts = CreateOptions {
        dry_run: false,
        ..member_opts
    };
    let mut sessions = Vec::with_capacity(names.len());
    for name in &names {
        sessions.push(create_session_unlocked(ws, name, &member_opts)?);
    }

    let steps = plan(&session_name, &sessions, &opts.agent_command);
    tmux::launch(mux, &steps)?;

    info!(
        event = "squad.created",
        session = %session_name,
        members = sessions.len()
    );
    Ok(Squad {
        session_name,
        sessions,
        steps,
        dry_run: false,
    })
}

fn plan(session_name: &str, sessions: &[SessionRecord], command: &str) -> Vec<TmuxStep> {
    let cwds: Vec<PathBuf> = sessions.iter().map(|s| s.worktree_path.clone()).collect();
    tmux::plan_squad(session_name, &cwds, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Fixture;
    use crate::tmux::tests::RecordingMux;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn opts() -> SquadOptions {
        SquadOptions {
            session_name: Some("sprint".to_string()),
            agent_command: "claude".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_names() {
        assert_eq!(
            validate_names(&names(&["API", " ui "]), None).expect("valid"),
            vec!["api", "ui"]
        );
        assert_eq!(
            validate_names(&names(&["!!!", "db"]), None).expect("valid"),
            vec!["db"]
        );
        assert!(matches!(
            validate_names(&[], None),
            Err(Error::NoSessionNames)
        ));
        assert!(matches!(
            validate_names(&names(&["api", "Api"]), None),
            Err(Error::DuplicateSessionName(ref n)) if n == "api"
        ));
        assert!(matches!(
            validate_names(&names(&["api", "ui"]), Some("feat/x")),
            Err(Error::AmbiguousBranchOverride)
        ));
        validate_names(&names(&["api"]), Some("feat/x")).expect("single with branch");
    }

    #[test]
    fn test_resolve_session_name() {
        assert_eq!(resolve_session_name(Some("Sprint 1")).expect("name"), "sprint-1");
        assert!(resolve_session_name(None).expect("name").starts_with("squad-"));
        assert!(matches!(
            resolve_session_name(Some("***")),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn test_duplicate_names_create_nothing() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux::default();
        let err = create_squad(&ws, &names(&["api", "api"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::DuplicateSessionName(_)), "{:?}", err);
        assert!(!ws.worktree_path("api").exists());
        assert!(mux.ran.borrow().is_empty());
    }

    #[test]
    fn test_squad_creates_sessions_and_tiles() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux::default();
        let squad = create_squad(&ws, &names(&["api", "ui", "db"]), &opts(), &mux).expect("squad");

        assert_eq!(squad.session_name, "sprint");
        let created: Vec<&str> = squad.sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(created, vec!["api", "ui", "db"]);
        for session in &squad.sessions {
            assert!(session.worktree_path.exists());
        }
        assert_eq!(ws.store().list().expect("list").records.len(), 3);

        let ran = mux.ran.borrow();
        assert_eq!(ran.len(), 4);
        assert!(matches!(
            &ran[0],
            TmuxStep::NewSession { cwd, .. } if *cwd == squad.sessions[0].worktree_path
        ));
        assert!(matches!(&ran[3], TmuxStep::SelectLayoutTiled { target } if target == "sprint:"));
    }

    #[test]
    fn test_squad_dry_run_plans_only() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux {
            unavailable: true,
            ..Default::default()
        };
        let squad = create_squad(
            &ws,
            &names(&["api", "ui"]),
            &SquadOptions {
                dry_run: true,
                ..opts()
            },
            &mux,
        )
        .expect("dry run");
        assert!(squad.dry_run);
        assert_eq!(squad.steps.len(), 3);
        assert!(!ws.worktree_path("api").exists());
        assert!(mux.ran.borrow().is_empty());
    }

    #[test]
    fn test_unavailable_multiplexer_creates_nothing() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux {
            unavailable: true,
            ..Default::default()
        };
        let err = create_squad(&ws, &names(&["api"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::MultiplexerUnavailable), "{:?}", err);
        assert!(!ws.worktree_path("api").exists());
    }

    #[test]
    fn test_taken_session_name_creates_nothing() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mut mux = RecordingMux::default();
        mux.existing.insert("sprint".to_string());
        let err = create_squad(&ws, &names(&["api", "ui"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::MultiplexerSessionExists(ref s) if s == "sprint"));
        assert!(ws.store().list().expect("list").records.is_empty());
    }

    #[test]
    fn test_member_collision_is_caught_before_creation() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        std::fs::create_dir_all(ws.worktree_path("ui")).expect("mkdir");
        let mux = RecordingMux::default();
        let err = create_squad(&ws, &names(&["api", "ui"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::WorktreePathExists(_)), "{:?}", err);
        assert!(!ws.worktree_path("api").exists());
    }

    #[test]
    fn test_launch_failure_keeps_created_sessions() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux {
            fail_on_run: true,
            ..Default::default()
        };
        let err = create_squad(&ws, &names(&["api", "ui"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::SubprocessFailed { .. }), "{:?}", err);

        assert!(ws.worktree_path("api").exists());
        assert!(ws.worktree_path("ui").exists());
        let records = ws.store().list().expect("list").records;
        let created: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(created, vec!["api", "ui"]);
    }

    /// Occupies a member's worktree path once validation has passed.
    struct ClaimsPathMux {
        inner: RecordingMux,
        claim: PathBuf,
    }

    impl Multiplexer for ClaimsPathMux {
        fn is_available(&self) -> bool {
            self.inner.is_available()
        }

        fn has_session(&self, name: &str) -> Result<bool> {
            std::fs::create_dir_all(&self.claim).expect("claim path");
            self.inner.has_session(name)
        }

        fn run(&self, step: &TmuxStep) -> Result<()> {
            self.inner.run(step)
        }
    }

    #[test]
    fn test_mid_batch_failure_keeps_earlier_members() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = ClaimsPathMux {
            inner: RecordingMux::default(),
            claim: ws.worktree_path("ui"),
        };
        let err = create_squad(&ws, &names(&["api", "ui", "db"]), &opts(), &mux).unwrap_err();
        assert!(matches!(err, Error::WorktreePathExists(_)), "{:?}", err);

        let records = ws.store().list().expect("list").records;
        let created: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(created, vec!["api"]);
        assert!(ws.worktree_path("api").join(".git").exists());
        assert!(!ws.worktree_path("db").exists());
        assert!(mux.inner.ran.borrow().is_empty());
    }

    #[test]
    fn test_single_member_with_branch_override() {
        let fx = Fixture::new();
        let ws = fx.workspace();
        let mux = RecordingMux::default();
        let squad = create_squad(
            &ws,
            &names(&["api"]),
            &SquadOptions {
                branch: Some("feat/api".to_string()),
                ..opts()
            },
            &mux,
        )
        .expect("squad");
        assert_eq!(squad.sessions[0].branch, "feat/api");
        assert_eq!(mux.ran.borrow().len(), 1);
    }
}
