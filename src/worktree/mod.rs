//! Git adapter.
//!
//! Wraps the `git` subprocess for root discovery, branch checks, worktree
//! add/remove/list and per-worktree status/log queries. Holds no state
//! beyond the repository root.

mod git;
mod list;
mod status;

pub use git::GitRepo;
pub use list::{parse_worktree_porcelain, WorktreeEntry};
pub use status::{parse_status_porcelain, StatusSummary};
