//! JSONL storage for matches
//!
//! Each match lives in `.scorebook/matches/{id}.jsonl`, one versioned
//! [`MatchRecord`] per line, newest last. Lines are only ever appended, so
//! the file doubles as the match's audit trail.
//!
//! Writers take an exclusive lock, re-read the latest version and append
//! only if it still matches the version they loaded. A mismatch means
//! another scorer got there first.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{restore, snapshot, MatchId, MatchState, ScoringCommand, SerializableMatchState};

use super::config::WORKSPACE_DIR;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Match already exists: {0}")]
    AlreadyExists(MatchId),

    #[error("Match {id} was changed by someone else (expected version {expected}, found {found}). Reload and try again.")]
    ConcurrentModification {
        id: MatchId,
        expected: u64,
        found: u64,
    },

    #[error("Match {0} has nothing left to undo")]
    NothingToUndo(MatchId),

    #[error("Corrupt match record in {path} at line {line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// One saved version of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub version: u64,
    /// Version this state was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    pub saved_at: DateTime<Utc>,
    pub saved_by: String,
    /// Command that produced this version (none for creation, start, undo)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<ScoringCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub snapshot: SerializableMatchState,
}

impl MatchRecord {
    /// Restores the engine state held by this record
    pub fn state(&self) -> Result<MatchState> {
        restore(self.snapshot.clone())
            .with_context(|| format!("Failed to restore {} version {}", self.id, self.version))
    }
}

/// What produced a new version
#[derive(Debug, Clone, Default)]
pub struct SaveMeta<'a> {
    pub saved_by: &'a str,
    pub command: Option<&'a ScoringCommand>,
    pub note: Option<&'a str>,
}

/// Store for match records in JSONL format
pub struct MatchStore {
    dir: PathBuf,
}

impl MatchStore {
    /// Creates a store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(WORKSPACE_DIR).join("matches"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, id: &MatchId) -> PathBuf {
        self.dir.join(format!("{}.jsonl", id))
    }

    /// Writes version 1 of a new match
    pub fn create(&self, id: &MatchId, state: &MatchState, meta: SaveMeta<'_>) -> Result<MatchRecord> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.path(id);
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(id.clone()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create match file: {}", path.display()));
            }
        };

        file.lock_exclusive()
            .context("Failed to acquire write lock on match file")?;

        let record = Self::record(id, 1, None, state, meta);
        Self::append_line(&file, &record)?;
        tracing::debug!(match_id = %id, "match created");
        Ok(record)
    }

    /// Reads the newest version
    pub fn load_latest(&self, id: &MatchId) -> Result<MatchRecord> {
        let file = self.open_read(id)?;
        file.lock_shared()
            .context("Failed to acquire read lock on match file")?;

        Self::last_record(&file, &self.path(id))?.ok_or_else(|| {
            StoreError::Corrupt {
                path: self.path(id),
                line: 0,
                reason: "file holds no records".to_string(),
            }
            .into()
        })
    }

    /// Reads every version, oldest first
    pub fn history(&self, id: &MatchId) -> Result<Vec<MatchRecord>> {
        let file = self.open_read(id)?;
        file.lock_shared()
            .context("Failed to acquire read lock on match file")?;

        Self::read_records(&file, &self.path(id))
    }

    /// Appends a new version if nobody else has saved since `expected`
    pub fn save(
        &self,
        id: &MatchId,
        expected: u64,
        state: &MatchState,
        meta: SaveMeta<'_>,
    ) -> Result<MatchRecord> {
        let path = self.path(id);
        let file = self.open_append(id)?;
        file.lock_exclusive()
            .context("Failed to acquire write lock on match file")?;

        let found = Self::last_record(&file, &path)?
            .map(|r| r.version)
            .unwrap_or(0);
        if found != expected {
            return Err(StoreError::ConcurrentModification {
                id: id.clone(),
                expected,
                found,
            }
            .into());
        }

        let record = Self::record(id, expected + 1, Some(expected), state, meta);
        Self::append_line(&file, &record)?;
        tracing::debug!(match_id = %id, version = record.version, "match saved");
        Ok(record)
    }

    /// Undoes the latest change by re-saving the state it was derived from
    ///
    /// Repeated undos keep walking back along the parent chain.
    pub fn undo(&self, id: &MatchId, expected: u64, saved_by: &str) -> Result<MatchRecord> {
        let path = self.path(id);
        let file = self.open_append(id)?;
        file.lock_exclusive()
            .context("Failed to acquire write lock on match file")?;

        let records = Self::read_records(&file, &path)?;
        let latest = records.last().ok_or_else(|| StoreError::MatchNotFound(id.clone()))?;
        if latest.version != expected {
            return Err(StoreError::ConcurrentModification {
                id: id.clone(),
                expected,
                found: latest.version,
            }
            .into());
        }

        let parent_version = latest
            .parent
            .ok_or_else(|| StoreError::NothingToUndo(id.clone()))?;
        let parent = records
            .iter()
            .find(|r| r.version == parent_version)
            .ok_or_else(|| StoreError::Corrupt {
                path: path.clone(),
                line: 0,
                reason: format!("parent version {} is missing", parent_version),
            })?;

        let state = parent.state()?;
        let note = format!("undo to version {}", parent.version);
        let mut record = Self::record(
            id,
            latest.version + 1,
            parent.parent,
            &state,
            SaveMeta {
                saved_by,
                command: None,
                note: Some(&note),
            },
        );
        // keep the exact stored snapshot rather than a re-derived one
        record.snapshot = parent.snapshot.clone();

        Self::append_line(&file, &record)?;
        tracing::debug!(match_id = %id, version = record.version, restored = parent.version, "match reverted");
        Ok(record)
    }

    /// Lists stored match ids, sorted
    pub fn list(&self) -> Result<Vec<MatchId>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "jsonl").unwrap_or(false) {
                if let Some(id) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.parse::<MatchId>().ok())
                {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn record(
        id: &MatchId,
        version: u64,
        parent: Option<u64>,
        state: &MatchState,
        meta: SaveMeta<'_>,
    ) -> MatchRecord {
        MatchRecord {
            id: id.clone(),
            version,
            parent,
            saved_at: Utc::now(),
            saved_by: meta.saved_by.to_string(),
            command: meta.command.cloned(),
            note: meta.note.map(str::to_string),
            snapshot: snapshot(state),
        }
    }

    fn open_read(&self, id: &MatchId) -> Result<File> {
        let path = self.path(id);
        if !path.is_file() {
            return Err(StoreError::MatchNotFound(id.clone()).into());
        }
        File::open(&path).with_context(|| format!("Failed to open match file: {}", path.display()))
    }

    fn open_append(&self, id: &MatchId) -> Result<File> {
        let path = self.path(id);
        if !path.is_file() {
            return Err(StoreError::MatchNotFound(id.clone()).into());
        }
        OpenOptions::new()
            .read(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open match file: {}", path.display()))
    }

    fn read_records(file: &File, path: &Path) -> Result<Vec<MatchRecord>> {
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(Self::parse_line(&line, path, line_num + 1)?);
        }

        Ok(records)
    }

    fn last_record(file: &File, path: &Path) -> Result<Option<MatchRecord>> {
        let reader = BufReader::new(file);
        let mut last = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
            if !line.trim().is_empty() {
                last = Some((line_num + 1, line));
            }
        }

        last.map(|(line_num, line)| Self::parse_line(&line, path, line_num))
            .transpose()
    }

    fn parse_line(line: &str, path: &Path, line_num: usize) -> Result<MatchRecord> {
        serde_json::from_str(line).map_err(|e| {
            StoreError::Corrupt {
                path: path.to_path_buf(),
                line: line_num,
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn append_line(mut file: &File, record: &MatchRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("Failed to serialize match record")?;
        writeln!(file, "{}", line).context("Failed to write match record")?;
        file.flush().context("Failed to flush match file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        apply, create_match, start_match, MatchFormat, Openers, Player, PlayerId, PlayerRole,
        Team, TeamSide, Toss, TossDecision,
    };
    use tempfile::TempDir;

    fn team(name: &str, prefix: &str) -> Team {
        Team {
            name: name.to_string(),
            roster: (1..=5)
                .map(|n| {
                    Player::new(
                        PlayerId::new(format!("{}-{}", prefix, n)).unwrap(),
                        format!("{} {}", name, n),
                        PlayerRole::Batter,
                    )
                })
                .collect(),
        }
    }

    fn new_match() -> (MatchId, MatchState) {
        let format = MatchFormat {
            overs_per_innings: 2,
            team1: team("Falcons", "fal"),
            team2: team("Herons", "her"),
        };
        let id = MatchId::new("Falcons", "Herons", Utc::now());
        let state = create_match(format, Toss::new(TeamSide::Team1, TossDecision::Bat)).unwrap();
        (id, state)
    }

    fn meta() -> SaveMeta<'static> {
        SaveMeta {
            saved_by: "tester",
            ..Default::default()
        }
    }

    fn pid(raw: &str) -> PlayerId {
        PlayerId::new(raw).unwrap()
    }

    #[test]
    fn create_and_load() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path().join("matches"));
        let (id, state) = new_match();

        store.create(&id, &state, meta()).unwrap();

        let loaded = store.load_latest(&id).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.saved_by, "tester");
        assert_eq!(loaded.state().unwrap(), state);
    }

    #[test]
    fn create_twice_fails() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, state) = new_match();

        store.create(&id, &state, meta()).unwrap();
        let err = store.create(&id, &state, meta()).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn missing_match_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, _) = new_match();

        let err = store.load_latest(&id).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::MatchNotFound(_))));
    }

    #[test]
    fn save_appends_versions() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, state) = new_match();
        store.create(&id, &state, meta()).unwrap();

        let started = start_match(&state, Openers::new(pid("fal-1"), pid("fal-2")), pid("her-1")).unwrap();
        let saved = store.save(&id, 1, &started, meta()).unwrap();
        assert_eq!(saved.version, 2);
        assert_eq!(saved.parent, Some(1));

        assert_eq!(store.history(&id).unwrap().len(), 2);
        assert_eq!(store.load_latest(&id).unwrap().state().unwrap(), started);
    }

    #[test]
    fn stale_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, state) = new_match();
        store.create(&id, &state, meta()).unwrap();

        let started = start_match(&state, Openers::new(pid("fal-1"), pid("fal-2")), pid("her-1")).unwrap();
        store.save(&id, 1, &started, meta()).unwrap();

        // a second scorer still holding version 1
        let err = store.save(&id, 1, &started, meta()).unwrap_err();
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::ConcurrentModification { expected, found, .. }) => {
                assert_eq!((*expected, *found), (1, 2));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.history(&id).unwrap().len(), 2);
    }

    #[test]
    fn undo_walks_back_the_parent_chain() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, state) = new_match();
        store.create(&id, &state, meta()).unwrap();

        let started = start_match(&state, Openers::new(pid("fal-1"), pid("fal-2")), pid("her-1")).unwrap();
        store.save(&id, 1, &started, meta()).unwrap();
        let four = ScoringCommand::runs(4);
        let scored = apply(&started, &four).unwrap().state;
        store
            .save(
                &id,
                2,
                &scored,
                SaveMeta {
                    saved_by: "tester",
                    command: Some(&four),
                    note: None,
                },
            )
            .unwrap();

        let undone = store.undo(&id, 3, "tester").unwrap();
        assert_eq!(undone.version, 4);
        assert_eq!(undone.state().unwrap(), started);

        let undone = store.undo(&id, 4, "tester").unwrap();
        assert_eq!(undone.state().unwrap(), state);

        let err = store.undo(&id, 5, "tester").unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NothingToUndo(_))));
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        let (id, state) = new_match();
        store.create(&id, &state, meta()).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.path(&id)).unwrap();
        writeln!(file, "{{not json").unwrap();

        let err = store.load_latest(&id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Corrupt { line: 2, .. })
        ));
    }

    #[test]
    fn list_returns_sorted_ids() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());

        let (id, state) = new_match();
        store.create(&id, &state, meta()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec![id]);
    }

    #[test]
    fn project_store_lives_in_workspace() {
        let dir = TempDir::new().unwrap();
        let store = MatchStore::for_project(dir.path());
        assert_eq!(store.dir(), dir.path().join(WORKSPACE_DIR).join("matches").as_path());
    }
}
