//! Aggregated progress statistics.

use serde::{Deserialize, Serialize};

use labhub_core::UserId;

/// One user's aggregated lab activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProgressStats {
    /// Labs this user has a record for
    pub total_started: u64,

    /// Labs completed
    pub completed: u64,

    /// Labs currently in progress
    pub in_progress: u64,

    /// Labs abandoned
    pub abandoned: u64,

    /// Total minutes across all labs
    pub total_time_minutes: u64,

    /// Mean completion percentage across all records
    pub average_completion: f64,
}

impl UserProgressStats {
    /// Completed labs as a percentage of started labs; 0 with no records.
    pub fn completion_rate(&self) -> f64 {
        if self.total_started == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total_started as f64 * 100.0
    }
}

/// One lab's aggregated engagement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabProgressStats {
    /// Distinct users with a record for this lab
    pub total_users: u64,

    /// Users who completed it
    pub completions: u64,

    /// Completions as a percentage of users; 0 with no users
    pub completion_rate: f64,

    /// Mean minutes spent per user
    pub average_time_minutes: f64,

    /// Mean completion percentage per user
    pub average_completion: f64,
}

/// System-wide progress totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalProgressStats {
    /// All progress records
    pub total_records: u64,

    /// Records in `Completed`
    pub completed: u64,

    /// Records in `InProgress`
    pub in_progress: u64,

    /// Records in `Abandoned`
    pub abandoned: u64,

    /// Records touched in the last week
    pub recent_activity: u64,
}

impl GlobalProgressStats {
    /// Completed records as a percentage of all records.
    pub fn completion_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total_records as f64 * 100.0
    }
}

/// Leaderboard row: completed-lab count per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionLeaderboardEntry {
    /// The user
    pub user_id: UserId,

    /// How many labs they completed
    pub completed_labs: u64,
}

/// Leaderboard row: total time spent per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLeaderboardEntry {
    /// The user
    pub user_id: UserId,

    /// Their total minutes across all labs
    pub total_minutes: u64,
}
