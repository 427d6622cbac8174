//! Extractor: pulls running records out of free-form AI response text.
//!
//! Model replies often wrap the JSON payload in prose, so the extractor scans
//! for the outermost bracket or brace span before decoding. The payload
//! itself must still be valid JSON; a decode failure is fatal for the call.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Result, RunlogError};
use crate::filter::filter_valid;
use crate::types::RunningRecord;

/// Object keys that may hold the record list, in lookup order.
const LIST_KEYS: [&str; 3] = ["records", "data", "items"];

static NO_RECORDS: Value = Value::Null;

fn fragment_re() -> &'static Regex {
    static FRAGMENT_RE: OnceLock<Regex> = OnceLock::new();
    FRAGMENT_RE.get_or_init(|| Regex::new(r"(?s)\[.*\]|\{.*\}").expect("valid fragment regex"))
}

/// Decode and validate the records embedded in `text`.
///
/// Empty text yields no records. Otherwise the leftmost `[...]` or `{...}`
/// span (greedy, spanning lines) is decoded, falling back to the whole text
/// when no span exists.
pub fn extract_records(text: &str) -> Result<Vec<RunningRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let fragment = json_fragment(text);
    let parsed: Value = serde_json::from_str(fragment)
        .map_err(|e| RunlogError::decode("extracted text", e))?;

    let records = filter_valid(record_list(&parsed));
    tracing::debug!(count = records.len(), "extracted running records");
    Ok(records)
}

/// The substring the extractor will try to decode.
pub fn json_fragment(text: &str) -> &str {
    fragment_re()
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text)
}

/// An array is the list itself; an object carries it under the first
/// present list key.
fn record_list(parsed: &Value) -> &Value {
    match parsed {
        Value::Array(_) => parsed,
        Value::Object(map) => LIST_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|value| is_truthy(value))
            .unwrap_or(&NO_RECORDS),
        _ => &NO_RECORDS,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
