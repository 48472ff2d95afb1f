//! Decide which reports are trustworthy enough to anchor a prediction.

use serde::Serialize;

use crate::report::{CaveStatus, Report};

/// A report is reliable only when its score is strictly greater than this.
pub const RELIABILITY_THRESHOLD: f64 = 0.8;

/// A report together with its score and reliability verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedReport {
    pub report: Report,
    /// `None` when the report has no votes and the score is undefined.
    pub score: Option<f64>,
    pub reliable: bool,
}

impl ClassifiedReport {
    /// Score and classify a single report.
    ///
    /// Zero-vote reports are never reliable.
    pub fn from_report(report: Report) -> Self {
        let score = match report.score() {
            Ok(score) => Some(score),
            Err(err) => {
                tracing::debug!(%err, "treating unvoted report as unreliable");
                None
            }
        };
        let reliable = score.is_some_and(|s| s > RELIABILITY_THRESHOLD);
        Self {
            report,
            score,
            reliable,
        }
    }

    pub fn is_reliable_closure(&self) -> bool {
        self.reliable && self.report.status == CaveStatus::Closed
    }
}

/// Classify every report, preserving input order.
///
/// The input is left untouched; each report is cloned into its classification.
pub fn classify(reports: &[Report]) -> Vec<ClassifiedReport> {
    reports
        .iter()
        .cloned()
        .map(ClassifiedReport::from_report)
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn report(status: CaveStatus, yes: u32, no: u32) -> Report {
        Report::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            status,
            yes,
            no,
        )
    }

    #[test]
    fn test_threshold_is_strict() {
        let classified = ClassifiedReport::from_report(report(CaveStatus::Closed, 9, 1));
        assert_eq!(classified.score, Some(0.8));
        assert!(!classified.reliable);
    }

    #[test]
    fn test_above_threshold_is_reliable() {
        let classified = ClassifiedReport::from_report(report(CaveStatus::Closed, 10, 1));
        assert!(classified.score.unwrap() > RELIABILITY_THRESHOLD);
        assert!(classified.reliable);
        assert!(classified.is_reliable_closure());
    }

    #[test]
    fn test_zero_votes_is_unreliable_not_error() {
        let classified = ClassifiedReport::from_report(report(CaveStatus::Closed, 0, 0));
        assert_eq!(classified.score, None);
        assert!(!classified.reliable);
        assert!(!classified.is_reliable_closure());
    }

    #[test]
    fn test_reliable_open_report_is_not_a_closure() {
        let classified = ClassifiedReport::from_report(report(CaveStatus::Open, 20, 0));
        assert!(classified.reliable);
        assert!(!classified.is_reliable_closure());
    }

    #[test]
    fn test_classify_preserves_order_and_input() {
        let reports = vec![
            report(CaveStatus::Open, 1, 5),
            report(CaveStatus::Closed, 0, 0),
            report(CaveStatus::Closed, 30, 1),
        ];
        let before = reports.clone();
        let classified = classify(&reports);

        assert_eq!(reports, before);
        assert_eq!(classified.len(), 3);
        let verdicts: Vec<bool> = classified.iter().map(|c| c.reliable).collect();
        assert_eq!(verdicts, vec![false, false, true]);
        for (c, r) in classified.iter().zip(&reports) {
            assert_eq!(&c.report, r);
        }
    }

    #[test]
    fn test_classify_empty() {
        assert!(classify(&[]).is_empty());
    }
}
