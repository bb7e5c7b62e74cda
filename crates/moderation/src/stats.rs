//! Aggregated report statistics.

use serde::{Deserialize, Serialize};

/// Report totals by lifecycle state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportStats {
    /// All reports ever filed
    pub total: u64,

    /// Reports waiting for an admin
    pub pending: u64,

    /// Reports currently under review
    pub under_review: u64,

    /// Reports closed with action
    pub resolved: u64,

    /// Reports closed without action
    pub dismissed: u64,

    /// Reports escalated and still open
    pub escalated: u64,
}

impl ReportStats {
    /// Resolved reports as a percentage of all reports.
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.resolved as f64 / self.total as f64 * 100.0
    }

    /// Pending reports as a percentage of all reports.
    pub fn pending_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.pending as f64 / self.total as f64 * 100.0
    }
}

/// Report volume over recent periods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPeriodStats {
    /// Reports filed in the last 7 days
    pub reports_this_week: u64,

    /// Reports filed in the last 30 days
    pub reports_this_month: u64,
}
