//! Parse the report feed into strongly typed [`Report`]s.
//!
//! The feed is a JSON object with a `reports` array. Each entry carries
//! `created_at`, `status`, `yes_count` and `no_count`. Entries without a
//! status are skipped. Any other malformed field rejects the whole batch so a
//! half-parsed feed never skews the closure computation.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{CaveError, Result};
use crate::report::{CaveStatus, Report};

/// ISO-8601 layouts with an offset that RFC 3339 parsing rejects: minute
/// precision and offsets written without a colon (`+0000`).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive layouts accepted for `created_at` when no offset is given.
///
/// Such timestamps are taken to be UTC. This deliberately differs from the
/// desktop predictor this replaces, which read them in the system's local
/// zone and so gave different answers on different machines.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a full response body.
///
/// # Errors
///
/// Returns [`CaveError::Fetch`] if the body is not JSON or has no `reports`
/// array, and [`CaveError::Parse`] if any entry is malformed.
pub fn parse_body(body: &str) -> Result<Vec<Report>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CaveError::Fetch(format!("response body is not valid JSON: {e}")))?;
    parse_value(&value)
}

/// Parse an already decoded response document.
pub fn parse_value(value: &Value) -> Result<Vec<Report>> {
    let entries = value
        .get("reports")
        .and_then(Value::as_array)
        .ok_or_else(|| CaveError::Fetch("response has no 'reports' array".to_string()))?;
    parse_entries(entries)
}

/// Parse a batch of raw entries, all-or-nothing.
pub fn parse_entries(entries: &[Value]) -> Result<Vec<Report>> {
    let mut reports = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;

    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(index, entry)? {
            Some(report) => reports.push(report),
            None => skipped += 1,
        }
    }

    tracing::debug!(
        parsed = reports.len(),
        skipped,
        "ingested report batch"
    );
    Ok(reports)
}

/// Parse one entry. `Ok(None)` means the entry has no status and is skipped.
fn parse_entry(index: usize, entry: &Value) -> Result<Option<Report>> {
    let fields = entry.as_object().ok_or_else(|| CaveError::Parse {
        index,
        reason: "entry is not an object".to_string(),
    })?;

    let status = match fields.get("status") {
        None | Some(Value::Null) => {
            tracing::trace!(index, "skipping entry without status");
            return Ok(None);
        }
        Some(raw) => parse_status(index, raw)?,
    };

    let timestamp = parse_created_at(index, fields)?;
    let yes_count = parse_count(index, fields, "yes_count")?;
    let no_count = parse_count(index, fields, "no_count")?;

    Ok(Some(Report::new(timestamp, status, yes_count, no_count)))
}

fn parse_status(index: usize, raw: &Value) -> Result<CaveStatus> {
    match raw.as_str().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("open") => Ok(CaveStatus::Open),
        Some(s) if s.eq_ignore_ascii_case("closed") => Ok(CaveStatus::Closed),
        _ => Err(CaveError::Parse {
            index,
            reason: format!("status must be 'open' or 'closed', got {raw}"),
        }),
    }
}

fn parse_created_at(index: usize, fields: &Map<String, Value>) -> Result<DateTime<Utc>> {
    let raw = fields
        .get("created_at")
        .ok_or_else(|| CaveError::Parse {
            index,
            reason: "missing 'created_at'".to_string(),
        })?
        .as_str()
        .ok_or_else(|| CaveError::Parse {
            index,
            reason: "'created_at' is not a string".to_string(),
        })?;

    parse_timestamp(raw).ok_or_else(|| CaveError::Parse {
        index,
        reason: format!("'created_at' is not an ISO-8601 timestamp: '{raw}'"),
    })
}

/// Parse an ISO-8601 timestamp, with or without an offset.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_count(index: usize, fields: &Map<String, Value>, name: &str) -> Result<u32> {
    let raw = fields.get(name).ok_or_else(|| CaveError::Parse {
        index,
        reason: format!("missing '{name}'"),
    })?;

    let count = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    count
        .and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| CaveError::Parse {
            index,
            reason: format!("'{name}' is not a non-negative integer: {raw}"),
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────
