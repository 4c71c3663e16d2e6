use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::write_json;
use crate::error::{Error, Result};

use super::record::SessionRecord;

/// Records found on disk plus the files that could not be parsed.
#[derive(Debug, Default)]
pub struct RecordSet {
    /// Sorted by session name.
    pub records: Vec<SessionRecord>,
    pub malformed: Vec<Error>,
}

/// One `<name>.json` file per session in a directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        write_json(&self.record_path(&record.name), record)
    }

    /// Read the record for `name`, if one exists.
    pub fn load(&self, name: &str) -> Result<Option<SessionRecord>> {
        let path = self.record_path(name);
        match fs::read(&path) {
            Ok(content) => parse_record(&path, &content).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(format!("failed to read {}", path.display()), e)),
        }
    }

    /// Every readable record. Malformed files are reported, not fatal.
    pub fn list(&self) -> Result<RecordSet> {
        let mut set = RecordSet::default();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(set),
            Err(e) => {
                return Err(Error::io(
                    format!("failed to read sessions dir {}", self.dir.display()),
                    e,
                ))
            }
        };

        for entry in entries {
            let entry = entry.map_err(|e| Error::io("failed to read sessions entry", e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
                continue;
            }
            let content = fs::read(&path)
                .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
            match parse_record(&path, &content) {
                Ok(record) => set.records.push(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping malformed session record");
                    set.malformed.push(err);
                }
            }
        }

        set.records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(set)
    }

    /// Delete the record for `name`. Returns whether a file was removed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.record_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(format!("failed to remove {}", path.display()), e)),
        }
    }
}

/// Undecodable bytes count as malformed, same as bad JSON.
fn parse_record(path: &Path, content: &[u8]) -> Result<SessionRecord> {
    serde_json::from_slice(content).map_err(|source| Error::MalformedRecord {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::record::RECORD_SCHEMA_VERSION;
    use tempfile::TempDir;

    fn record(name: &str) -> SessionRecord {
        SessionRecord {
            schema_version: RECORD_SCHEMA_VERSION,
            name: name.to_string(),
            branch: format!("codex/{}-1", name),
            base_branch: "main".to_string(),
            worktree_path: PathBuf::from(format!("/r/.ccws/worktrees/{}", name)),
            created_at: "2026-02-26T22:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_save_load_remove() {
        let temp = TempDir::new().expect("temp dir");
        let store = SessionStore::new(temp.path().join("sessions"));
        assert_eq!(store.load("api").expect("load"), None);

        store.save(&record("api")).expect("save");
        let raw = fs::read_to_string(store.record_path("api")).expect("read");
        assert!(raw.ends_with("}\n"));
        assert!(raw.contains("\n  \"name\": \"api\""));
        assert_eq!(store.load("api").expect("load"), Some(record("api")));

        assert!(store.remove("api").expect("remove"));
        assert!(!store.remove("api").expect("remove again"));
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp = TempDir::new().expect("temp dir");
        let set = SessionStore::new(temp.path().join("nope")).list().expect("list");
        assert!(set.records.is_empty());
        assert!(set.malformed.is_empty());
    }

    #[test]
    fn test_list_sorts_and_skips_malformed() {
        let temp = TempDir::new().expect("temp dir");
        let store = SessionStore::new(temp.path());
        store.save(&record("ui")).expect("save");
        store.save(&record("api")).expect("save");
        fs::write(temp.path().join("broken.json"), "{ not json").expect("write");
        fs::write(temp.path().join("notes.txt"), "ignored").expect("write");

        let set = store.list().expect("list");
        let names: Vec<&str> = set.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["api", "ui"]);
        assert_eq!(set.malformed.len(), 1);
        assert!(matches!(set.malformed[0], Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_list_skips_non_utf8_record() {
        let temp = TempDir::new().expect("temp dir");
        let store = SessionStore::new(temp.path());
        store.save(&record("api")).expect("save");
        fs::write(temp.path().join("broken.json"), [0xff, 0xfe, 0x00]).expect("write");

        let set = store.list().expect("list");
        assert_eq!(set.records, vec![record("api")]);
        assert_eq!(set.malformed.len(), 1);
        assert!(matches!(set.malformed[0], Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_load_non_utf8_is_malformed() {
        let temp = TempDir::new().expect("temp dir");
        let store = SessionStore::new(temp.path());
        fs::write(store.record_path("api"), [0xff, 0xfe]).expect("write");
        assert!(matches!(
            store.load("api"),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_load_malformed_is_error() {
        let temp = TempDir::new().expect("temp dir");
        let store = SessionStore::new(temp.path());
        fs::write(store.record_path("api"), "[]").expect("write");
        assert!(matches!(
            store.load("api"),
            Err(Error::MalformedRecord { .. })
        ));
    }
}
