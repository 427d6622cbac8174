//! Test builders: ergonomic constructors for records and scratch stores.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, TimeZone, Utc};
use runlog_core::{RecordStore, RunningRecord, StoreLayout};
use serde_json::Value;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RunningRecord`] expectations.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("2024-01-05")
///     .distance(10.0)
///     .heart_rate(134.0)
///     .build();
/// ```
pub struct RecordBuilder {
    record: RunningRecord,
}

impl RecordBuilder {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            record: RunningRecord {
                date: date.into(),
                ..Default::default()
            },
        }
    }

    pub fn distance(mut self, km: f64) -> Self {
        self.record.distance = Some(km);
        self
    }

    pub fn cadence(mut self, spm: f64) -> Self {
        self.record.cadence = Some(spm);
        self
    }

    pub fn heart_rate(mut self, bpm: f64) -> Self {
        self.record.heart_rate = Some(bpm);
        self
    }

    pub fn pace(mut self, min_per_km: f64) -> Self {
        self.record.pace = Some(min_per_km);
        self
    }

    pub fn build(self) -> RunningRecord {
        self.record
    }
}

/// A valid record with only date and distance.
pub fn run(date: &str, km: f64) -> RunningRecord {
    RecordBuilder::new(date).distance(km).build()
}

/// Serialise records back into the untyped shape the store accepts.
pub fn as_payload(records: &[RunningRecord]) -> Value {
    serde_json::to_value(records).unwrap()
}

// ---------------------------------------------------------------------------
// TestStore
// ---------------------------------------------------------------------------

/// A [`RecordStore`] rooted in its own temporary directory.
///
/// The directory is removed when the `TestStore` is dropped.
pub struct TestStore {
    pub tmp: tempfile::TempDir,
    pub store: RecordStore,
}

impl TestStore {
    /// Store under `<tmp>/data` with no seed candidates.
    pub fn new() -> Self {
        Self::with_layout(|layout| layout)
    }

    /// Store whose layout is adjusted by `f` before opening. Paths inside the
    /// temporary directory can be computed from the layout's `dir`.
    pub fn with_layout(f: impl FnOnce(StoreLayout) -> StoreLayout) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let layout = f(StoreLayout::in_dir(tmp.path().join("data")));
        Self {
            store: RecordStore::new(layout),
            tmp,
        }
    }

    /// Pin the backup clock to one instant.
    pub fn frozen(mut self) -> Self {
        self.store = self.store.clone().with_clock(frozen_clock);
        self
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn records_path(&self) -> PathBuf {
        self.store.records_path()
    }

    /// The main file decoded as untyped JSON.
    pub fn main_json(&self) -> Value {
        read_json(&self.records_path())
    }
}

/// The instant used by [`TestStore::frozen`].
pub fn frozen_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 10, 20, 30).unwrap()
}

pub fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("{} is not JSON: {e}", path.display()))
}
