//! Find the most recent instant at which the cave is confidently known closed.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::reliability::ClassifiedReport;

/// Order reports latest first.
///
/// Reports sharing a timestamp are ordered by descending score (unscored
/// reports last); remaining ties keep their input order.
pub fn sort_latest_first(reports: &mut [ClassifiedReport]) {
    reports.sort_by(latest_first);
}

fn latest_first(a: &ClassifiedReport, b: &ClassifiedReport) -> Ordering {
    b.report
        .timestamp
        .cmp(&a.report.timestamp)
        .then_with(|| compare_scores(b.score, a.score))
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// The report anchoring the latest reliable closure, if any.
///
/// Accepts reports in any arrival order; the input slice is not reordered.
pub fn latest_reliable_closure(reports: &[ClassifiedReport]) -> Option<&ClassifiedReport> {
    let mut ordered: Vec<&ClassifiedReport> = reports.iter().collect();
    ordered.sort_by(|a, b| latest_first(a, b));
    ordered.into_iter().find(|r| r.is_reliable_closure())
}

/// The timestamp of the latest reliable closure.
///
/// `None` means the last closing time cannot be determined and no forecast
/// should be made.
pub fn last_close_time(reports: &[ClassifiedReport]) -> Option<DateTime<Utc>> {
    latest_reliable_closure(reports).map(|r| r.report.timestamp)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reliability::classify;
    use crate::report::{CaveStatus, Report};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn report(hours: i64, status: CaveStatus, yes: u32, no: u32) -> Report {
        Report::new(base() + Duration::hours(hours), status, yes, no)
    }

    #[test]
    fn test_empty_collection_has_no_closure() {
        assert_eq!(last_close_time(&[]), None);
    }

    #[test]
    fn test_only_open_reports_has_no_closure() {
        let classified = classify(&[
            report(0, CaveStatus::Open, 10, 0),
            report(1, CaveStatus::Open, 10, 0),
        ]);
        assert_eq!(last_close_time(&classified), None);
    }

    #[test]
    fn test_only_unreliable_closures_has_no_closure() {
        let classified = classify(&[
            report(0, CaveStatus::Closed, 9, 1),
            report(1, CaveStatus::Closed, 0, 0),
            report(2, CaveStatus::Closed, 1, 1),
        ]);
        assert_eq!(last_close_time(&classified), None);
    }

    #[test]
    fn test_skips_later_open_report() {
        let classified = classify(&[
            report(0, CaveStatus::Closed, 10, 0),
            report(5, CaveStatus::Open, 10, 0),
        ]);
        assert_eq!(last_close_time(&classified), Some(base()));
    }

    #[test]
    fn test_skips_later_unreliable_closure() {
        let classified = classify(&[
            report(0, CaveStatus::Closed, 12, 1),
            report(3, CaveStatus::Closed, 2, 1),
            report(1, CaveStatus::Closed, 10, 0),
        ]);
        assert_eq!(
            last_close_time(&classified),
            Some(base() + Duration::hours(1))
        );
    }

    #[test]
    fn test_duplicates_are_tolerated() {
        let r = report(2, CaveStatus::Closed, 10, 0);
        let classified = classify(&[r.clone(), r.clone(), r]);
        assert_eq!(
            last_close_time(&classified),
            Some(base() + Duration::hours(2))
        );
    }

    #[test]
    fn test_tie_prefers_highest_score() {
        let classified = classify(&[
            report(4, CaveStatus::Closed, 10, 1),
            report(4, CaveStatus::Closed, 40, 0),
            report(4, CaveStatus::Closed, 20, 1),
        ]);
        let found = latest_reliable_closure(&classified).unwrap();
        assert_eq!(found.report.yes_count, 40);
    }

    #[test]
    fn test_sort_latest_first_orders_by_time_then_score() {
        let mut classified = classify(&[
            report(1, CaveStatus::Open, 1, 1),
            report(3, CaveStatus::Closed, 0, 0),
            report(3, CaveStatus::Closed, 5, 0),
            report(2, CaveStatus::Open, 3, 0),
        ]);
        sort_latest_first(&mut classified);
        let order: Vec<(i64, Option<f64>)> = classified
            .iter()
            .map(|c| ((c.report.timestamp - base()).num_hours(), c.score))
            .collect();
        assert_eq!(
            order,
            vec![(3, Some(1.0)), (3, None), (2, Some(1.0)), (1, Some(0.0))]
        );
    }

    fn arb_report() -> impl Strategy<Value = Report> {
        (0i64..48, any::<bool>(), 0u32..30, 0u32..5).prop_map(|(h, open, yes, no)| {
            let status = if open {
                CaveStatus::Open
            } else {
                CaveStatus::Closed
            };
            report(h, status, yes, no)
        })
    }

    proptest! {
        #[test]
        fn prop_detector_ignores_input_order(
            (reports, shuffled) in prop::collection::vec(arb_report(), 0..20)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let a = last_close_time(&classify(&reports));
            let b = last_close_time(&classify(&shuffled));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_found_closure_is_latest_qualifying(
            reports in prop::collection::vec(arb_report(), 0..20)
        ) {
            let classified = classify(&reports);
            let expected = classified
                .iter()
                .filter(|c| c.is_reliable_closure())
                .map(|c| c.report.timestamp)
                .max();
            prop_assert_eq!(last_close_time(&classified), expected);
        }
    }
}
