//! runlog: personal running-log tracker.
//!
//! This crate is the host shell around [`runlog_core`]: it wires the
//! configured [`RecordStore`] to the three calls a front end makes, and the
//! `runlog` binary exposes the same calls on the command line.
//!
//! # Architecture
//!
//! ```text
//! AI reply text ──► extract_records_from_text ──► Extraction { records, rawText }
//!                                                     │ (user confirms)
//! candidate JSON ──► save_records ──► backup ──► running-data.json
//!                                                     │
//!                    get_records ◄────────────────────┘
//! ```

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

pub use runlog_core::{
    config::Config, BackupReceipt, RecordStore, Result, RunlogError, RunningRecord, StoreLayout,
};

/// Records pulled out of an AI reply, together with the text they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub records: Vec<RunningRecord>,
    pub raw_text: String,
}

/// The running-log calls available to a front end.
#[derive(Debug, Clone)]
pub struct RunningLog {
    store: RecordStore,
}

impl RunningLog {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Build from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(RecordStore::new(config.store_layout()))
    }

    /// Current collection; seeds it on first use.
    pub fn get_records(&self) -> Result<Vec<RunningRecord>> {
        self.store.read()
    }

    /// Validate and persist a candidate collection, backing up the old one.
    pub fn save_records(&self, candidates: &Value) -> Result<BackupReceipt> {
        self.store.write(candidates)
    }

    /// Turn an AI reply into validated records. Nothing is persisted.
    pub fn extract_records_from_text(&self, text: &str) -> Result<Extraction> {
        let records = runlog_core::extract_records(text)?;
        Ok(Extraction {
            records,
            raw_text: text.to_string(),
        })
    }

    /// Backup files, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        self.store.backups()
    }
}
