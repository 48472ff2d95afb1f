//! Presentation helpers: timestamps as `YYYY-MM-DD HH:MM` in a display zone,
//! and flat rows for the report table.
//!
//! Nothing here reads the network; the functions only format pipeline output
//! so any front end shows the same text.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{CaveError, Result};
use crate::forecast::Forecast;
use crate::reliability::ClassifiedReport;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The zone timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The system's local time zone.
    #[default]
    Local,
    /// An explicit IANA zone.
    Named(Tz),
}

impl DisplayZone {
    /// Parse an IANA zone name such as `"Europe/Berlin"`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidTimezone`] if the name is not a known zone.
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(DisplayZone::Named)
            .map_err(|_| CaveError::InvalidTimezone(format!("'{}'", name)))
    }
}

/// Format an instant as `YYYY-MM-DD HH:MM` in `zone`.
pub fn format_timestamp(instant: DateTime<Utc>, zone: DisplayZone) -> String {
    match zone {
        DisplayZone::Local => instant.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
        DisplayZone::Named(tz) => instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
    }
}

/// A forecast with every instant already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastView {
    pub last_close: String,
    pub predicted_open: String,
    pub window_start: String,
    pub window_end: String,
}

impl ForecastView {
    pub fn new(forecast: &Forecast, zone: DisplayZone) -> Self {
        Self {
            last_close: format_timestamp(forecast.last_close, zone),
            predicted_open: format_timestamp(forecast.predicted_open, zone),
            window_start: format_timestamp(forecast.window_start, zone),
            window_end: format_timestamp(forecast.window_end, zone),
        }
    }
}

/// One line of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub timestamp: String,
    pub status: &'static str,
    pub yes_count: u32,
    pub no_count: u32,
    /// Three decimals, or `"n/a"` for unvoted reports.
    pub score: String,
    pub reliable: bool,
}

impl ReportRow {
    pub fn new(classified: &ClassifiedReport, zone: DisplayZone) -> Self {
        let report = &classified.report;
        Self {
            timestamp: format_timestamp(report.timestamp, zone),
            status: report.status.as_str(),
            yes_count: report.yes_count,
            no_count: report.no_count,
            score: classified
                .score
                .map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}")),
            reliable: classified.reliable,
        }
    }
}

/// Rows for every report, in the order given.
pub fn report_rows(reports: &[ClassifiedReport], zone: DisplayZone) -> Vec<ReportRow> {
    reports.iter().map(|r| ReportRow::new(r, zone)).collect()
}
