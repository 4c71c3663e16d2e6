//! Session lifecycle: create, tear down, and reconcile against live worktrees.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::naming::{iso_timestamp, normalize_session_name, timestamp_slug};
use crate::template::{self, BRIEF_FILE_NAME};
use crate::workspace::Workspace;
use crate::worktree::WorktreeEntry;

use super::record::{SessionRecord, RECORD_SCHEMA_VERSION};

/// Options for [`create_session`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Base branch; the repository default when `None`.
    pub base_branch: Option<String>,
    /// Explicit branch name instead of `<prefix><name>-<slug>`.
    pub branch: Option<String>,
    pub dry_run: bool,
}

/// Create a session: branch, worktree, brief and record.
///
/// Every collision is checked before anything is created. In dry-run mode
/// the record that would be written is returned and nothing changes.
pub fn create_session(ws: &Workspace, raw_name: &str, opts: &CreateOptions) -> Result<SessionRecord> {
    if opts.dry_run {
        return create_session_unlocked(ws, raw_name, opts);
    }
    let _lock = ws.lock()?;
    create_session_unlocked(ws, raw_name, opts)
}

/// [`create_session`] for callers already holding the repository lock.
pub(crate) fn create_session_unlocked(
    ws: &Workspace,
    raw_name: &str,
    opts: &CreateOptions,
) -> Result<SessionRecord> {
    let name = normalize_session_name(raw_name);
    if name.is_empty() {
        return Err(Error::InvalidName(raw_name.to_string()));
    }

    let base_branch = opts
        .base_branch
        .clone()
        .unwrap_or_else(|| ws.config.default_base_branch.clone());
    ws.git.check_base_exists(&base_branch)?;

    let branch = match &opts.branch {
        Some(branch) => branch.clone(),
        None => format!("{}{}-{}", ws.config.branch_prefix, name, timestamp_slug()),
    };
    if ws.git.branch_exists(&branch)? {
        return Err(Error::BranchAlreadyExists(branch));
    }

    let worktree_path = ws.worktree_path(&name);
    if worktree_path.exists() {
        return Err(Error::WorktreePathExists(worktree_path));
    }

    let record = SessionRecord {
        schema_version: RECORD_SCHEMA_VERSION,
        name,
        branch,
        base_branch,
        worktree_path,
        created_at: iso_timestamp(),
    };
    if opts.dry_run {
        return Ok(record);
    }

    let store = ws.store();
    for dir in [ws.workspace_root(), store.dir().to_path_buf()] {
        fs::create_dir_all(&dir)
            .map_err(|e| Error::io(format!("failed to create {}", dir.display()), e))?;
    }

    ws.git.ensure_base_exists(&record.base_branch)?;
    ws.git
        .add_worktree(&record.branch, &record.worktree_path, &record.base_branch)?;

    let mut undo = Compensation::default();
    undo.push(Undo::DeleteBranch(record.branch.clone()));
    undo.push(Undo::RemoveWorktree(record.worktree_path.clone()));

    if let Err(err) = write_brief(ws, &record).and_then(|()| store.save(&record)) {
        undo.run(ws);
        return Err(err);
    }

    info!(
        event = "session.created",
        name = %record.name,
        branch = %record.branch,
        base = %record.base_branch
    );
    Ok(record)
}

fn write_brief(ws: &Workspace, record: &SessionRecord) -> Result<()> {
    let template = template::load(&ws.template_path(), &ws.settings.default_template)?;
    let brief = template::render(&template, &record.brief_vars());
    let path = record.worktree_path.join(BRIEF_FILE_NAME);
    fs::write(&path, brief).map_err(|e| Error::io(format!("failed to write {}", path.display()), e))
}

enum Undo {
    RemoveWorktree(PathBuf),
    DeleteBranch(String),
}

/// Undo steps run newest first when a later creation step fails.
#[derive(Default)]
struct Compensation {
    steps: Vec<Undo>,
}

impl Compensation {
    fn push(&mut self, step: Undo) {
        self.steps.push(step);
    }

    fn run(self, ws: &Workspace) {
        for step in self.steps.into_iter().rev() {
            let result = match &step {
                Undo::RemoveWorktree(path) => ws.git.remove_worktree(path, true),
                Undo::DeleteBranch(branch) => ws.git.delete_branch(branch),
            };
            if let Err(err) = result {
                warn!(error = %err, "rollback step failed");
            }
        }
    }
}

/// Options for [`teardown_session`].
#[derive(Debug, Clone, Default)]
pub struct TeardownOptions {
    pub delete_branch: bool,
    /// Remove the worktree even with local changes.
    pub forced: bool,
    pub dry_run: bool,
}

/// What teardown did, or would do in dry-run mode.
#[derive(Debug, Clone)]
pub struct TeardownOutcome {
    pub name: String,
    pub worktree_path: PathBuf,
    pub branch: Option<String>,
    pub branch_deleted: bool,
    pub record_removed: bool,
    /// Non-fatal problems, already phrased for the user.
    pub warnings: Vec<String>,
    /// Git commands run (or planned in dry-run mode).
    pub commands: Vec<String>,
    pub dry_run: bool,
}

/// Remove a session's worktree, optionally its branch, and its record.
///
/// Works without a record: the path comes from the naming convention and
/// the branch from the live worktree listing.
pub fn teardown_session(
    ws: &Workspace,
    raw_name: &str,
    opts: &TeardownOptions,
) -> Result<TeardownOutcome> {
    let name = normalize_session_name(raw_name);
    if name.is_empty() {
        return Err(Error::InvalidName(raw_name.to_string()));
    }
    let _lock = if opts.dry_run { None } else { Some(ws.lock()?) };

    let store = ws.store();
    let mut warnings = Vec::new();
    let record = match store.load(&name) {
        Ok(record) => record,
        Err(err @ Error::MalformedRecord { .. }) => {
            warn!(error = %err, "ignoring malformed session record");
            warnings.push(err.to_string());
            None
        }
        Err(err) => return Err(err),
    };

    let worktree_path = record
        .as_ref()
        .map(|r| r.worktree_path.clone())
        .unwrap_or_else(|| ws.worktree_path(&name));
    if !worktree_path.exists() {
        return Err(Error::WorktreeNotFound(worktree_path));
    }

    let branch = match &record {
        Some(r) => Some(r.branch.clone()),
        None => live_branch_for(ws, &worktree_path)?,
    };

    let mut commands = vec![ws.git.describe_remove_worktree(&worktree_path, opts.forced)];
    if opts.delete_branch {
        if let Some(branch) = &branch {
            commands.push(ws.git.describe_delete_branch(branch));
        }
    }

    let mut outcome = TeardownOutcome {
        name,
        worktree_path,
        branch,
        branch_deleted: false,
        record_removed: false,
        warnings,
        commands,
        dry_run: opts.dry_run,
    };
    if opts.dry_run {
        return Ok(outcome);
    }

    ws.git.remove_worktree(&outcome.worktree_path, opts.forced)?;

    if opts.delete_branch {
        if let Some(branch) = &outcome.branch {
            match ws.git.delete_branch(branch) {
                Ok(()) => outcome.branch_deleted = true,
                Err(err) => {
                    warn!(branch = %branch, error = %err, "branch deletion failed");
                    outcome
                        .warnings
                        .push(format!("failed to delete branch {}.", branch));
                }
            }
        }
    }

    outcome.record_removed = store.remove(&outcome.name)?;

    info!(
        event = "session.torn_down",
        name = %outcome.name,
        branch_deleted = outcome.branch_deleted
    );
    Ok(outcome)
}

fn live_branch_for(ws: &Workspace, path: &Path) -> Result<Option<String>> {
    let entries = ws.git.list_worktrees()?;
    Ok(entries
        .into_iter()
        .find(|entry| same_path(&entry.path, path))
        .and_then(|entry| entry.branch))
}

/// Exact match, falling back to canonical paths for symlinked roots.
fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// One managed worktree joined with its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub name: String,
    pub branch: Option<String>,
    pub path: PathBuf,
    pub created_at: Option<String>,
    /// Whether a session record matched this worktree.
    pub tracked: bool,
}

/// Live worktrees reconciled against stored records.
#[derive(Debug)]
pub struct StatusReport {
    pub rows: Vec<StatusRow>,
    /// Records whose worktree is no longer registered.
    pub stale: Vec<SessionRecord>,
    /// Messages for session files that could not be parsed.
    pub malformed: Vec<String>,
}

/// Read-only reconciliation of managed worktrees and session records.
pub fn status_report(ws: &Workspace) -> Result<StatusReport> {
    let entries = ws.git.list_worktrees()?;
    let set = ws.store().list()?;
    Ok(reconcile(
        &ws.workspace_root(),
        entries,
        set.records,
        set.malformed.iter().map(Error::to_string).collect(),
    ))
}

fn reconcile(
    managed_root: &Path,
    entries: Vec<WorktreeEntry>,
    records: Vec<SessionRecord>,
    malformed: Vec<String>,
) -> StatusReport {
    let mut matched = vec![false; records.len()];
    let mut rows = Vec::new();

    for entry in entries {
        let record_idx = records
            .iter()
            .position(|r| same_path(&r.worktree_path, &entry.path));
        if let Some(idx) = record_idx {
            matched[idx] = true;
        }
        if !entry.path.starts_with(managed_root) {
            continue;
        }
        let record = record_idx.map(|idx| &records[idx]);

        let name = match record {
            Some(r) => r.name.clone(),
            None => entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.path.display().to_string()),
        };
        rows.push(StatusRow {
            name,
            branch: entry.branch.or_else(|| record.map(|r| r.branch.clone())),
            path: entry.path,
            created_at: record.map(|r| r.created_at.clone()),
            tracked: record.is_some(),
        });
    }

    let stale = records
        .into_iter()
        .zip(matched)
        .filter_map(|(record, seen)| (!seen).then_some(record))
        .collect();

    StatusReport {
        rows,
        stale,
        malformed,
    }
}
