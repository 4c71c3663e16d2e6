//! Standup report: live change summary for every recorded session.

use crate::error::Result;
use crate::session::SessionRecord;
use crate::workspace::Workspace;
use crate::worktree::{GitRepo, StatusSummary};

/// Live state of one session's worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The worktree path no longer exists.
    Missing,
    /// Querying git failed; carries the message.
    Error(String),
    Active {
        last_commit: Option<String>,
        changes: StatusSummary,
    },
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub record: SessionRecord,
    pub state: SessionState,
    /// First changed paths, bounded by the requested count.
    pub top_files: Vec<String>,
}

pub fn summarize_session(git: &GitRepo, record: &SessionRecord, max_files: usize) -> SessionSummary {
    let path = &record.worktree_path;
    let state = if !path.exists() {
        SessionState::Missing
    } else {
        match git.status(path) {
            Err(err) => SessionState::Error(err.to_string()),
            Ok(changes) => match git.last_commit(path) {
                Err(err) => SessionState::Error(err.to_string()),
                Ok(last_commit) => SessionState::Active {
                    last_commit,
                    changes,
                },
            },
        }
    };

    let top_files = match &state {
        SessionState::Active { changes, .. } => changes.top_files(max_files).to_vec(),
        _ => Vec::new(),
    };

    SessionSummary {
        record: record.clone(),
        state,
        top_files,
    }
}

/// Summaries for every readable record, ordered by session name.
pub fn standup_report(ws: &Workspace, max_files: usize) -> Result<Vec<SessionSummary>> {
    let set = ws.store().list()?;
    Ok(set
        .records
        .iter()
        .map(|record| summarize_session(&ws.git, record, max_files))
        .collect())
}
