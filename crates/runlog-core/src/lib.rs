//! runlog-core: running-log ingestion pipeline.
//!
//! This crate exposes the pipeline layers as public modules, plus the shared
//! types used across all of them.
//!
//! # Architecture
//!
//! ```text
//! AI text ──► Extractor ──► Filter ──► Store
//!                             │
//!                        Normalizer (per record)
//! ```
//!
//! The normalizer never fails; it degrades noisy input to empty/absent
//! values. Rejection happens in the filter, and contract violations are
//! surfaced as [`RunlogError`] by the extractor and the store.

pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod normalizer;
pub mod store;
pub mod types;

pub use error::{Result, RunlogError};
pub use extractor::extract_records;
pub use filter::{filter_records, filter_valid};
pub use normalizer::normalize;
pub use store::{BackupReceipt, RecordStore, StoreLayout};
pub use types::{Field, RawRecord, RunningRecord};
