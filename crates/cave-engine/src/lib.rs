//! # cave-engine
//!
//! Predicts the next opening of the Golden Pig Cave from crowd-sourced,
//! vote-scored reports of its open/closed state.
//!
//! One cycle fetches a fresh batch of reports, scores each by its votes, finds
//! the latest closure the crowd agrees on, and shifts it by a fixed historical
//! gap to get a predicted opening and a window around it. Nothing is kept
//! between cycles.
//!
//! ## Modules
//!
//! - [`report`] — The report value and its vote score
//! - [`reliability`] — Reliability threshold and per-report classification
//! - [`closure`] — Latest reliable closure detection
//! - [`forecast`] — Closure time → predicted opening window
//! - [`ingest`] — Fail-fast parsing of the JSON feed
//! - [`source`] — Pluggable report sources (HTTP feed, in-memory JSON)
//! - [`config`] — Feed settings
//! - [`pipeline`] — The single recalculate entry point
//! - [`render`] — Display formatting for front ends
//! - [`error`] — Error types

pub mod closure;
pub mod config;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod pipeline;
pub mod reliability;
pub mod render;
pub mod report;
pub mod source;

pub use closure::{last_close_time, latest_reliable_closure, sort_latest_first};
pub use config::SourceConfig;
pub use error::{CaveError, Result};
pub use forecast::{forecast_from_closure, Forecast, AVERAGE_GAP_HOURS, VARIATION_HOURS};
pub use pipeline::{predict, predict_from_reports, Prediction};
pub use reliability::{classify, ClassifiedReport, RELIABILITY_THRESHOLD};
pub use render::{format_timestamp, report_rows, DisplayZone, ForecastView, ReportRow};
pub use report::{CaveStatus, Report};
pub use source::{HttpSource, JsonSource, ReportSource};
