use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Current on-disk schema of session records.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    RECORD_SCHEMA_VERSION
}

/// Persisted description of one session. Written once, deleted on teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    pub branch: String,
    pub base_branch: String,
    pub worktree_path: PathBuf,
    pub created_at: String,
}

impl SessionRecord {
    /// Placeholder values for the session brief.
    pub fn brief_vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        vars.insert("session_name", self.name.clone());
        vars.insert("branch", self.branch.clone());
        vars.insert("base_branch", self.base_branch.clone());
        vars.insert("worktree_path", self.worktree_path.display().to_string());
        vars.insert("created_at", self.created_at.clone());
        vars
    }
}
