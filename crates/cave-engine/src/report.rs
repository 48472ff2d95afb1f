//! The vote-scored observation of the cave's state at one instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaveError, Result};

/// Whether the cave was reported open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaveStatus {
    Open,
    Closed,
}

impl CaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaveStatus::Open => "open",
            CaveStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for CaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One crowd-sourced report with its corroborating and contradicting votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub status: CaveStatus,
    pub yes_count: u32,
    pub no_count: u32,
}

impl Report {
    pub fn new(timestamp: DateTime<Utc>, status: CaveStatus, yes_count: u32, no_count: u32) -> Self {
        Self {
            timestamp,
            status,
            yes_count,
            no_count,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == CaveStatus::Open
    }

    pub fn total_votes(&self) -> u64 {
        u64::from(self.yes_count) + u64::from(self.no_count)
    }

    /// Net agreement among the votes: `(yes - no) / (yes + no)`.
    ///
    /// The result always lies in `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidReport`] when the report has no votes at all,
    /// since the ratio is undefined.
    pub fn score(&self) -> Result<f64> {
        let total = self.total_votes();
        if total == 0 {
            return Err(CaveError::InvalidReport(format!(
                "report at {} has no votes",
                self.timestamp.to_rfc3339()
            )));
        }
        let net = f64::from(self.yes_count) - f64::from(self.no_count);
        Ok(net / total as f64)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
