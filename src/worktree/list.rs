use std::path::PathBuf;

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    pub head: Option<String>,
    /// Short branch name; `None` for detached or bare worktrees.
    pub branch: Option<String>,
}

/// Parse `git worktree list --porcelain` output.
///
/// Records are separated by blank lines, but a new `worktree` line also
/// starts a record. Unknown attribute lines (`bare`, `detached`, `locked`,
/// `prunable`) are ignored.
pub fn parse_worktree_porcelain(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            entries.extend(current.take());
            continue;
        }
        if let Some(path) = line.strip_prefix("worktree ") {
            entries.extend(current.take());
            current = Some(WorktreeEntry {
                path: PathBuf::from(path.trim()),
                head: None,
                branch: None,
            });
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            if let Some(entry) = current.as_mut() {
                entry.head = Some(head.trim().to_string());
            }
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            if let Some(entry) = current.as_mut() {
                let branch_ref = branch_ref.trim();
                let short = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
                entry.branch = Some(short.to_string());
            }
        }
    }
    entries.extend(current);

    entries
}
