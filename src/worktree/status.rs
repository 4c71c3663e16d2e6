/// Change counts derived from `git status --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub staged: usize,
    pub unstaged: usize,
    pub untracked: usize,
    /// Changed paths in porcelain order.
    pub files: Vec<String>,
}

impl StatusSummary {
    /// Number of changed entries (one per porcelain line).
    pub fn total_changes(&self) -> usize {
        self.files.len()
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    pub fn top_files(&self, max: usize) -> &[String] {
        &self.files[..self.files.len().min(max)]
    }
}

/// Parse `git status --porcelain` (v1) output.
///
/// `??` lines are untracked. Otherwise the first column counts as staged and
/// the second as unstaged when not blank. A single line may count as both.
pub fn parse_status_porcelain(output: &str) -> StatusSummary {
    let mut summary = StatusSummary::default();

    for line in output.lines() {
        if line.len() < 4 {
            continue;
        }
        let Some(path) = line.get(3..) else {
            continue;
        };

        if line.starts_with("??") {
            summary.untracked += 1;
        } else {
            let mut codes = line.chars();
            let x = codes.next().unwrap_or(' ');
            let y = codes.next().unwrap_or(' ');
            if x != ' ' && x != '?' {
                summary.staged += 1;
            }
            if y != ' ' && y != '?' {
                summary.unstaged += 1;
            }
        }
        summary.files.push(path.trim().to_string());
    }

    summary
}
