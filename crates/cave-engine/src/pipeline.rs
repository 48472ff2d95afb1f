//! The single recalculate entry point: fetch, classify, detect, forecast.

use serde::Serialize;

use crate::closure::{latest_reliable_closure, sort_latest_first};
use crate::error::{CaveError, Result};
use crate::forecast::{forecast_from_closure, Forecast};
use crate::reliability::{classify, ClassifiedReport};
use crate::report::Report;
use crate::source::ReportSource;

/// The outcome of one successful cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub forecast: Forecast,
    /// Every ingested report with its classification, latest first.
    pub reports: Vec<ClassifiedReport>,
}

/// Run one full cycle against `source`.
///
/// # Errors
///
/// Fetch and parse failures abort the cycle before detection.
/// [`CaveError::NoReliableClosure`] means there is not enough data to predict.
pub fn predict<S: ReportSource + ?Sized>(source: &S) -> Result<Prediction> {
    let reports = source.fetch_reports()?;
    tracing::debug!(count = reports.len(), "fetched reports");
    predict_from_reports(&reports)
}

/// Run the cycle on reports the caller already holds.
pub fn predict_from_reports(reports: &[Report]) -> Result<Prediction> {
    let mut classified = classify(reports);

    let last_close = latest_reliable_closure(&classified)
        .map(|r| r.report.timestamp)
        .ok_or(CaveError::NoReliableClosure)?;
    tracing::info!(last_close = %last_close.to_rfc3339(), "found latest reliable closure");

    let forecast = forecast_from_closure(last_close)?;
    sort_latest_first(&mut classified);

    Ok(Prediction {
        forecast,
        reports: classified,
    })
}
