//! ccws (cc-worktree-squad): parallel coding sessions on isolated git worktrees.
//!
//! Each session is a git branch, a worktree checked out on it, a rendered
//! brief inside the worktree, and a JSON record. Sessions can be launched
//! alone or as a squad tiled in one tmux window.
//!
//! ## Layout
//!
//! Everything lives under `.ccws/` at the repository root:
//! - `.ccws/config.json` - Repository configuration
//! - `.ccws/session-template.md` - Brief template (`{{placeholder}}` tokens)
//! - `.ccws/worktrees/<name>/` - One worktree per session, with `SESSION_BRIEF.md`
//! - `.ccws/sessions/<name>.json` - One record per session
//! - `.ccws/ccws.lock` - Advisory lock held by mutating commands

pub mod color;
pub mod config;
pub mod error;
pub mod lock;
pub mod naming;
pub mod process;
pub mod session;
pub mod squad;
pub mod standup;
pub mod template;
#[doc(hidden)]
pub mod testutil;
pub mod tmux;
pub mod workspace;
pub mod worktree;

pub use error::{Error, Result};
