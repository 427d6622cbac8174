//! Store: the persisted running-record collection and its backups.
//!
//! The store is the single source of truth for saved records. Every write
//! snapshots the previous file into a timestamped backup before the main
//! file is touched, and backups are never overwritten or removed.
//!
//! ## Layout
//!
//! ```text
//! <data_dir>/
//! ├── running-data.json                          # current collection
//! ├── running-data-backup-2024-01-05-10-20-30.json
//! └── running-data-backup-2024-01-05-10-20-30-1.json   # same-second write
//! ```
//!
//! The main file is replaced atomically (temp file + rename), so a failed
//! write leaves either the old collection or the new one, never a torn file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, RunlogError};
use crate::filter::filter_valid;
use crate::types::RunningRecord;

pub const DEFAULT_RECORDS_FILE: &str = "running-data.json";
pub const DEFAULT_BACKUP_PREFIX: &str = "running-data-backup";

/// UTC, second precision, dashes only so names sort and stay portable.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
const BACKUP_TIMESTAMP_LEN: usize = 19;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Where the store keeps its files and where it looks for seed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub dir: PathBuf,
    pub records_file: String,
    pub backup_prefix: String,
    /// Tried in order on first read; the first existing file wins.
    pub seed_candidates: Vec<PathBuf>,
}

impl StoreLayout {
    /// Default file names inside `dir`, with no seed candidates.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            records_file: DEFAULT_RECORDS_FILE.to_string(),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
            seed_candidates: Vec::new(),
        }
    }

    pub fn with_seed(mut self, candidate: impl Into<PathBuf>) -> Self {
        self.seed_candidates.push(candidate.into());
        self
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupReceipt {
    pub backup_path: PathBuf,
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordStore {
    layout: StoreLayout,
    clock: fn() -> DateTime<Utc>,
}

impl RecordStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self {
            layout,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to stamp backup names.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.layout.dir
    }

    pub fn records_path(&self) -> PathBuf {
        self.layout.dir.join(&self.layout.records_file)
    }

    /// Return the persisted collection, seeding it on first use.
    ///
    /// An existing file is returned as stored, without re-validation. When
    /// there is none (or it holds `null`), the first seed candidate found is
    /// normalised, written as the new collection and returned; with no seed
    /// at all the collection starts empty.
    pub fn read(&self) -> Result<Vec<RunningRecord>> {
        let path = self.records_path();
        if let Some(text) = read_if_exists(&path)? {
            let stored: Option<Vec<RunningRecord>> = serde_json::from_str(&text)
                .map_err(|e| RunlogError::decode(path.display().to_string(), e))?;
            if let Some(records) = stored {
                tracing::debug!(path = %path.display(), count = records.len(), "read running records");
                return Ok(records);
            }
        }

        let seed = self.seed_records()?;
        self.ensure_dir()?;
        replace_atomically(&path, &to_pretty_json(&seed)?)?;
        tracing::info!(path = %path.display(), count = seed.len(), "initialised running records");
        Ok(seed)
    }

    /// Validate `candidates`, back up the current collection, then replace it.
    ///
    /// Fails with [`RunlogError::Validation`] before touching the disk when
    /// the payload is not an array or holds no valid record. The backup
    /// holds the previous file, or the new records on the very first write.
    pub fn write(&self, candidates: &Value) -> Result<BackupReceipt> {
        if !candidates.is_array() {
            return Err(RunlogError::validation("running data must be an array"));
        }
        let records = filter_valid(candidates);
        if records.is_empty() {
            return Err(RunlogError::validation(
                "running data is empty or contains no valid record",
            ));
        }
        self.commit(&records)
    }

    /// Existing backups, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.layout.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RunlogError::io(&self.layout.dir, e)),
        };

        let prefix = format!("{}-", self.layout.backup_prefix);
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RunlogError::io(&self.layout.dir, e))?;
            let file_name = entry.file_name();
            let Some(stamp) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(&prefix))
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            found.push((backup_sort_key(stamp), entry.path()));
        }
        found.sort();
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn commit(&self, records: &[RunningRecord]) -> Result<BackupReceipt> {
        self.ensure_dir()?;
        let path = self.records_path();
        let content = to_pretty_json(records)?;

        let backup_source = match read_if_exists(&path)? {
            Some(existing) => existing,
            None => content.clone(),
        };
        let backup_path = self.write_backup(&backup_source)?;
        tracing::info!(path = %backup_path.display(), "backup created");

        // The backup is durable from here on; a failure below still leaves
        // the previous collection recoverable.
        replace_atomically(&path, &content)?;
        tracing::info!(path = %path.display(), count = records.len(), "running records saved");

        Ok(BackupReceipt { backup_path })
    }

    /// Create a new backup file, suffixing `-1`, `-2`, … on same-second
    /// collisions. Existing files are never opened for writing.
    fn write_backup(&self, content: &str) -> Result<PathBuf> {
        let base = backup_base_name(&self.layout.backup_prefix, (self.clock)());
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{base}.json"),
                n => format!("{base}-{n}.json"),
            };
            let path = self.layout.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .and_then(|()| file.sync_all())
                        .map_err(|e| RunlogError::io(&path, e))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(RunlogError::io(&path, e)),
            }
        }
    }

    fn seed_records(&self) -> Result<Vec<RunningRecord>> {
        for candidate in &self.layout.seed_candidates {
            let Some(text) = read_if_exists(candidate)? else {
                continue;
            };
            let raw: Value = serde_json::from_str(&text)
                .map_err(|e| RunlogError::decode(candidate.display().to_string(), e))?;
            if raw.is_null() {
                continue;
            }
            if !raw.is_array() {
                tracing::warn!(path = %candidate.display(), "seed data is not an array; starting empty");
            }
            let records = filter_valid(&raw);
            tracing::info!(path = %candidate.display(), count = records.len(), "loaded seed data");
            return Ok(records);
        }
        tracing::debug!("no seed data found");
        Ok(Vec::new())
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.layout.dir).map_err(|e| RunlogError::io(&self.layout.dir, e))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Backup file stem for `now`, e.g. `running-data-backup-2024-01-05-10-20-30`.
pub fn backup_base_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}", now.format(BACKUP_TIMESTAMP_FORMAT))
}

/// Orders `…-30.json` before `…-30-1.json` before `…-30-2.json`.
fn backup_sort_key(stamp: &str) -> (String, u32) {
    if let Some(n) = stamp
        .get(BACKUP_TIMESTAMP_LEN..)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|n| n.parse::<u32>().ok())
    {
        return (stamp[..BACKUP_TIMESTAMP_LEN].to_string(), n);
    }
    (stamp.to_string(), 0)
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RunlogError::io(path, e)),
    }
}

fn to_pretty_json(records: &[RunningRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| RunlogError::Encode {
        context: "running records".to_string(),
        source: e,
    })
}

fn replace_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| RunlogError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| RunlogError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| RunlogError::io(path, e.error))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
