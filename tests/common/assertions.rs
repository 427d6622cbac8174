//! Domain-specific assertion macros for runlog harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* record invariant was violated.

use runlog_core::RunningRecord;
use std::path::Path;

// ---------------------------------------------------------------------------
// Field assertions
// ---------------------------------------------------------------------------

/// Assert that a record's named numeric field is absent.
///
/// ```rust
/// assert_absent!(record, heart_rate);
/// ```
#[macro_export]
macro_rules! assert_absent {
    ($record:expr, $field:ident) => {{
        let record: &runlog_core::RunningRecord = &$record;
        if let Some(actual) = record.$field {
            panic!(
                "assert_absent! failed: {} should be absent but was {}\n  record: {:?}",
                stringify!($field),
                actual,
                record
            );
        }
    }};
}

/// Assert that a record's named numeric field holds the expected value.
///
/// ```rust
/// assert_measure!(record, distance, 10.5);
/// ```
#[macro_export]
macro_rules! assert_measure {
    ($record:expr, $field:ident, $expected:expr) => {{
        let record: &runlog_core::RunningRecord = &$record;
        let expected: f64 = $expected;
        match record.$field {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_measure! failed:\n  {}\n  expected: {}\n  actual:   {}",
                stringify!($field),
                expected,
                actual
            ),
            None => panic!(
                "assert_measure! failed: {} is absent, expected {}\n  record: {:?}",
                stringify!($field),
                expected,
                record
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Collection assertions
// ---------------------------------------------------------------------------

/// Assert that every record in a collection satisfies a predicate.
///
/// ```rust
/// assert_records_all!(records, |r| r.is_valid());
/// ```
#[macro_export]
macro_rules! assert_records_all {
    ($records:expr, $pred:expr) => {{
        let records: &[runlog_core::RunningRecord] = &$records;
        let pred: &dyn Fn(&runlog_core::RunningRecord) -> bool = &$pred;
        let failing: Vec<_> = records.iter().filter(|r| !pred(r)).collect();
        if !failing.is_empty() {
            panic!(
                "assert_records_all! failed: {} of {} records did not satisfy predicate.\n  first: {:?}",
                failing.len(),
                records.len(),
                failing[0]
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that a date is in zero-padded `YYYY-MM-DD` form.
pub fn assert_canonical_date(date: &str) {
    let bytes = date.as_bytes();
    let ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    assert!(ok, "date {date:?} is not canonical YYYY-MM-DD");
}

/// Assert that a backup file decodes to exactly `expected`.
pub fn assert_backup_holds(path: &Path, expected: &[RunningRecord]) {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("backup {} unreadable: {e}", path.display()));
    let actual: Vec<RunningRecord> = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("backup {} is not a record array: {e}", path.display()));
    pretty_assertions::assert_eq!(actual, expected, "backup {} content", path.display());
}
