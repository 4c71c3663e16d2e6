//! Session brief template loading and rendering.
//!
//! Templates are plain Markdown with `{{ placeholder }}` tokens. Rendering is
//! a single substitution pass with no control flow; unknown placeholders
//! render as an empty string.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Error, Result};

/// File written at the root of every new worktree.
pub const BRIEF_FILE_NAME: &str = "SESSION_BRIEF.md";

/// Default brief written by `ccws init`.
pub const DEFAULT_TEMPLATE: &str = "# Session Brief

You are working in a dedicated worktree session.

- Session name: {{session_name}}
- Branch: {{branch}}
- Base branch: {{base_branch}}
- Worktree path: {{worktree_path}}
- Created at: {{created_at}}

## Goal
- Fill this section before coding.

## Constraints
- Keep commits small and focused.
- Run tests/lint relevant to the changes.
";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Render a template with variable substitution.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Load the brief template, falling back to `fallback` when the file is
/// missing.
pub fn load(path: &Path, fallback: &str) -> Result<String> {
    if !path.exists() {
        return Ok(fallback.to_string());
    }
    fs::read_to_string(path)
        .map_err(|e| Error::io(format!("failed to read template {}", path.display()), e))
}
