//! Sessions: the persisted record, its store, and the lifecycle that keeps
//! record, branch and worktree consistent.

mod lifecycle;
mod record;
mod store;

pub use lifecycle::{
    create_session, status_report, teardown_session, CreateOptions, StatusReport, StatusRow,
    TeardownOptions, TeardownOutcome,
};
pub(crate) use lifecycle::create_session_unlocked;
pub use record::{SessionRecord, RECORD_SCHEMA_VERSION};
pub use store::{RecordSet, SessionStore};
