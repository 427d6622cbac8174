//! Filter: normalises a batch of raw records and drops the unusable ones.

use serde_json::Value;

use crate::normalizer::normalize;
use crate::types::{RawRecord, RunningRecord};

/// Normalise every element of a JSON array and keep the valid records.
///
/// Anything other than an array yields an empty collection. Elements that
/// are not objects normalise like an empty record and are dropped. Survivors
/// keep their input order.
pub fn filter_valid(raws: &Value) -> Vec<RunningRecord> {
    let Some(items) = raws.as_array() else {
        return Vec::new();
    };
    let empty = RawRecord::new();
    items
        .iter()
        .map(|item| normalize(item.as_object().unwrap_or(&empty)))
        .filter(RunningRecord::is_valid)
        .collect()
}

/// Typed variant of [`filter_valid`] for callers that already hold objects.
pub fn filter_records(raws: &[RawRecord]) -> Vec<RunningRecord> {
    raws.iter()
        .map(normalize)
        .filter(RunningRecord::is_valid)
        .collect()
}
