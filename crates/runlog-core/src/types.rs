//! Core types for runlog-core.
//!
//! This module defines the canonical [`RunningRecord`], the untyped
//! [`RawRecord`] it is normalised from, and the [`Field`] discriminant used
//! by the alias table.

use serde::{Deserialize, Serialize};

/// A loosely-keyed input object before normalisation.
///
/// Keys may be English, Chinese, or one of the alternate aliases; values may
/// be strings, numbers, or anything else JSON can hold. Only the normalizer
/// looks inside it.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A canonical running-log entry, as persisted and charted.
///
/// Absent measurements serialise as `null`, never as zero and never omitted,
/// so the on-disk shape is stable across records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningRecord {
    /// `YYYY-MM-DD` when the input had a recognisable date, otherwise the
    /// trimmed raw text.
    #[serde(default)]
    pub date: String,
    /// Kilometres.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Steps per minute.
    #[serde(default)]
    pub cadence: Option<f64>,
    /// Beats per minute.
    #[serde(default)]
    pub heart_rate: Option<f64>,
    /// Minutes per kilometre.
    #[serde(default)]
    pub pace: Option<f64>,
}

impl RunningRecord {
    /// A record is kept only with a non-empty date and a finite distance.
    pub fn is_valid(&self) -> bool {
        !self.date.is_empty() && self.distance.is_some_and(f64::is_finite)
    }
}

/// Semantic field of a [`RunningRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Distance,
    Cadence,
    HeartRate,
    Pace,
}

impl Field {
    pub const COUNT: usize = 5;
}
