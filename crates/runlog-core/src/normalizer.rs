//! Normalizer: resolves one [`RawRecord`] into a canonical [`RunningRecord`].
//!
//! Key lookup goes through a static alias table: every accepted key maps to
//! the field it feeds and a rank, and the lowest-ranked alias carrying a
//! value wins. Values are then coerced field by field. Nothing here fails;
//! unusable input becomes an empty date or an absent number, and the filter
//! decides what to drop.

use std::borrow::Cow;
use std::sync::OnceLock;

use phf::phf_map;
use regex::Regex;
use serde_json::Value;

use crate::types::{Field, RawRecord, RunningRecord};

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Raw key → (field, rank). Rank 0 is the English key.
static ALIASES: phf::Map<&'static str, (Field, u8)> = phf_map! {
    "date" => (Field::Date, 0),
    "日期" => (Field::Date, 1),
    "time" => (Field::Date, 2),
    "时间" => (Field::Date, 3),
    "时时" => (Field::Date, 4),
    "distance" => (Field::Distance, 0),
    "距离" => (Field::Distance, 1),
    "cadence" => (Field::Cadence, 0),
    "步频" => (Field::Cadence, 1),
    "heartRate" => (Field::HeartRate, 0),
    "心率" => (Field::HeartRate, 1),
    "pace" => (Field::Pace, 0),
    "配速" => (Field::Pace, 1),
};

fn date_re() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| {
        Regex::new(r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})").expect("valid date regex")
    })
}

fn dash_run_re() -> &'static Regex {
    static DASH_RUN_RE: OnceLock<Regex> = OnceLock::new();
    DASH_RUN_RE.get_or_init(|| Regex::new(r"-{2,}").expect("valid dash run regex"))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalise one raw record. Never fails.
pub fn normalize(raw: &RawRecord) -> RunningRecord {
    let picked = pick_values(raw);
    let value = |field: Field| picked[field as usize];

    RunningRecord {
        date: normalize_date(value(Field::Date)),
        distance: normalize_number(value(Field::Distance)),
        cadence: normalize_number(value(Field::Cadence)),
        heart_rate: normalize_number(value(Field::HeartRate)),
        pace: normalize_number(value(Field::Pace)),
    }
}

/// Canonical `YYYY-MM-DD` for a date-ish value.
///
/// Chinese separators, dots and slashes become dashes and the first
/// `YYYY-M-D` run is zero-padded. Without such a run the trimmed input is
/// returned unchanged; a missing value yields an empty string.
pub fn normalize_date(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let text = coerce_to_string(value);
    let raw = text.trim();

    let dashed: String = raw
        .chars()
        .map(|c| match c {
            '年' | '月' | '日' | '.' | '/' => '-',
            other => other,
        })
        .collect();
    let collapsed = dash_run_re().replace_all(&dashed, "-");
    let candidate = collapsed.strip_suffix('-').unwrap_or(&collapsed);

    match date_re().captures(candidate) {
        Some(caps) => format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]),
        None => raw.to_string(),
    }
}

/// Best-effort decimal for a numeric-ish value.
///
/// JSON numbers pass through. Anything else is stringified, stripped of every
/// character other than ASCII digits, `.` and `-`, and parsed. Unparseable or
/// non-finite results are absent, never zero.
pub fn normalize_number(value: Option<&Value>) -> Option<f64> {
    let text = match value? {
        Value::Null => return None,
        Value::Number(n) => return n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    };
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// For each field, the value of the best-ranked alias that carries one.
fn pick_values(raw: &RawRecord) -> [Option<&Value>; Field::COUNT] {
    let mut best: [Option<(u8, &Value)>; Field::COUNT] = [None; Field::COUNT];
    for (key, value) in raw {
        let Some(&(field, rank)) = ALIASES.get(key.as_str()) else {
            continue;
        };
        if !is_present(value) {
            continue;
        }
        let slot = &mut best[field as usize];
        if slot.map_or(true, |(current, _)| rank < current) {
            *slot = Some((rank, value));
        }
    }
    best.map(|slot| slot.map(|(_, value)| value))
}

/// `null`, `false` and `""` fall through to the next alias.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn coerce_to_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
