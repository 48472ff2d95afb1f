//! Turn a closing time into a predicted opening instant and window.
//!
//! The cave historically reopens about [`AVERAGE_GAP_HOURS`] after closing,
//! give or take [`VARIATION_HOURS`]. The forecast is a fixed translation of
//! the closing time; nothing is learned from the data.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{CaveError, Result};

/// Mean time between a closure and the next opening.
pub const AVERAGE_GAP_HOURS: i64 = 11;

/// Half-width of the likely opening window.
pub const VARIATION_HOURS: i64 = 2;

pub fn average_gap() -> Duration {
    Duration::hours(AVERAGE_GAP_HOURS)
}

pub fn variation() -> Duration {
    Duration::hours(VARIATION_HOURS)
}

/// A predicted opening with its symmetric uncertainty window.
///
/// Always satisfies `window_start < predicted_open < window_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Forecast {
    /// The closure the prediction is anchored on.
    pub last_close: DateTime<Utc>,
    pub predicted_open: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

impl Forecast {
    pub fn window_width(&self) -> Duration {
        self.window_end - self.window_start
    }

    /// Whether `instant` falls inside the likely opening window (inclusive).
    pub fn window_contains(&self, instant: DateTime<Utc>) -> bool {
        self.window_start <= instant && instant <= self.window_end
    }
}

/// Predict the next opening from the last reliable closing time.
///
/// # Errors
///
/// Returns [`CaveError::Forecast`] if the shifted timestamps fall outside the
/// representable range.
pub fn forecast_from_closure(last_close: DateTime<Utc>) -> Result<Forecast> {
    let predicted_open = shift(last_close, average_gap())?;
    let window_start = shift(predicted_open, -variation())?;
    let window_end = shift(predicted_open, variation())?;

    Ok(Forecast {
        last_close,
        predicted_open,
        window_start,
        window_end,
    })
}

fn shift(instant: DateTime<Utc>, by: Duration) -> Result<DateTime<Utc>> {
    instant.checked_add_signed(by).ok_or_else(|| {
        CaveError::Forecast(format!(
            "'{}' shifted by {}s is out of range",
            instant.to_rfc3339(),
            by.num_seconds()
        ))
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
