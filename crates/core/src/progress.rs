//! Per-user, per-lab progress record and its status state machine.

use serde::{Deserialize, Serialize};

use crate::id::{LabId, ProgressId, UserId};
use crate::Time;

/// Status of a user's engagement with one lab.
///
/// Transitions: `NotStarted → InProgress` (start, or any partial update),
/// `InProgress → Completed` (percentage reaches 100), `InProgress →
/// Abandoned` (explicit only), `Abandoned → InProgress` (resume, explicit
/// or via a partial update), `Completed → InProgress` (percentage drops
/// below 100 again), any state `→ NotStarted` (explicit reset only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    /// Record exists but the lab has not been started
    NotStarted,
    /// Lab is actively being worked on
    InProgress,
    /// Lab finished at 100%
    Completed,
    /// User walked away; percentage and time are kept
    Abandoned,
}

impl ProgressStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "not_started",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(ProgressStatus::NotStarted),
            "in_progress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            "abandoned" => Ok(ProgressStatus::Abandoned),
            other => Err(format!("unknown progress status: {other}")),
        }
    }
}

/// One user's completion-tracking record for one lab.
///
/// At most one record exists per `(user_id, lab_id)` pair. Invariants held
/// by the transition helpers below:
/// `completion_percentage == 100` ⇔ `status == Completed` ⇔
/// `completed_at.is_some()`, and `status == NotStarted` ⇔
/// `started_at.is_none()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Unique identifier
    pub id: ProgressId,

    /// Owning user
    pub user_id: UserId,

    /// The lab this record tracks
    pub lab_id: LabId,

    /// Current status
    pub status: ProgressStatus,

    /// When the lab was first started (unset while `NotStarted`)
    pub started_at: Option<Time>,

    /// When the lab reached 100% (unset until completed)
    pub completed_at: Option<Time>,

    /// Last time the user touched this lab
    pub last_accessed_at: Time,

    /// Accumulated minutes; only a reset lowers this
    pub time_spent_minutes: u32,

    /// Completion percentage, clamped to 0–100
    pub completion_percentage: u8,

    /// Free-form user notes
    pub notes: Option<String>,

    /// Distinct starts of this lab (first start and every post-reset start)
    pub attempts_count: u32,
}

impl ProgressRecord {
    /// Create a fresh, not-yet-started record for a `(user, lab)` pair.
    pub fn new(user_id: UserId, lab_id: LabId) -> Self {
        Self {
            id: ProgressId::new(),
            user_id,
            lab_id,
            status: ProgressStatus::NotStarted,
            started_at: None,
            completed_at: None,
            last_accessed_at: chrono::Utc::now(),
            time_spent_minutes: 0,
            completion_percentage: 0,
            notes: None,
            attempts_count: 0,
        }
    }

    /// Start the lab. Only a `NotStarted` record transitions (and counts an
    /// attempt); in every other state this just refreshes `last_accessed_at`.
    pub fn start(&mut self) {
        if self.status == ProgressStatus::NotStarted {
            self.status = ProgressStatus::InProgress;
            self.started_at = Some(chrono::Utc::now());
            self.attempts_count += 1;
        }
        self.touch();
    }

    /// Force the record to `Completed` at 100%, stamping `completed_at` on
    /// the first completion only.
    pub fn complete(&mut self) {
        self.status = ProgressStatus::Completed;
        self.completion_percentage = 100;
        if self.completed_at.is_none() {
            self.completed_at = Some(chrono::Utc::now());
        }
        self.touch();
    }

    /// Mark the record abandoned. Percentage and accumulated time are kept.
    pub fn abandon(&mut self) {
        self.status = ProgressStatus::Abandoned;
        self.touch();
    }

    /// Return to `InProgress` from `Abandoned`.
    pub fn resume(&mut self) {
        self.status = ProgressStatus::InProgress;
        self.touch();
    }

    /// Wipe the record back to `NotStarted`: percentage, time, and notes are
    /// cleared, both lifecycle timestamps unset.
    pub fn reset(&mut self) {
        self.status = ProgressStatus::NotStarted;
        self.completion_percentage = 0;
        self.time_spent_minutes = 0;
        self.notes = None;
        self.started_at = None;
        self.completed_at = None;
        self.touch();
    }

    /// Set the completion percentage, clamping into 0–100.
    ///
    /// Reaching 100 completes the record; any value in 1–99 (re)enters
    /// `InProgress`, which is how an abandoned lab silently resumes. A value
    /// of 0 records the update without changing status.
    pub fn set_completion_percentage(&mut self, percentage: u8) {
        self.completion_percentage = percentage.min(100);

        if self.completion_percentage == 100 {
            self.status = ProgressStatus::Completed;
            if self.completed_at.is_none() {
                self.completed_at = Some(chrono::Utc::now());
            }
        } else if self.status == ProgressStatus::Completed {
            // Dropping below 100 reopens the record; a later return to 100
            // is a new completion event
            self.status = ProgressStatus::InProgress;
            self.completed_at = None;
        } else if self.completion_percentage > 0 {
            self.status = ProgressStatus::InProgress;
        }
    }

    /// Accumulate time spent on the lab.
    pub fn add_time_spent(&mut self, minutes: u32) {
        self.time_spent_minutes = self.time_spent_minutes.saturating_add(minutes);
    }

    /// Refresh `last_accessed_at`.
    pub fn touch(&mut self) {
        self.last_accessed_at = chrono::Utc::now();
    }

    /// Whether the lab is completed.
    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed
    }

    /// Whether the lab is actively in progress.
    pub fn is_in_progress(&self) -> bool {
        self.status == ProgressStatus::InProgress
    }

    /// Whether the lab has never been started (or was reset).
    pub fn is_not_started(&self) -> bool {
        self.status == ProgressStatus::NotStarted
    }

    /// Whether the lab was abandoned.
    pub fn is_abandoned(&self) -> bool {
        self.status == ProgressStatus::Abandoned
    }

    /// Whether `user` owns this record.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Filter for querying progress records.
#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    /// Restrict to one user
    pub user_id: Option<UserId>,

    /// Restrict to one lab
    pub lab_id: Option<LabId>,

    /// Restrict to one status
    pub status: Option<ProgressStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_not_started() {
        let record = ProgressRecord::new(UserId::new(), LabId::new());
        assert_eq!(record.status, ProgressStatus::NotStarted);
        assert!(record.started_at.is_none());
        assert!(record.completed_at.is_none());
        assert_eq!(record.completion_percentage, 0);
        assert_eq!(record.attempts_count, 0);
    }

    #[test]
    fn start_transitions_once_and_counts_attempt() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        assert_eq!(record.status, ProgressStatus::InProgress);
        assert!(record.started_at.is_some());
        assert_eq!(record.attempts_count, 1);

        let started = record.started_at;
        record.start();
        // Second start is a touch, not a new attempt
        assert_eq!(record.attempts_count, 1);
        assert_eq!(record.started_at, started);
    }

    #[test]
    fn percentage_is_clamped() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.set_completion_percentage(250);
        assert_eq!(record.completion_percentage, 100);
        assert_eq!(record.status, ProgressStatus::Completed);
    }

    #[test]
    fn full_percentage_completes_and_stamps_once() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.set_completion_percentage(100);
        let first = record.completed_at;
        assert!(first.is_some());

        record.set_completion_percentage(100);
        assert_eq!(record.completed_at, first);
    }

    #[test]
    fn partial_update_resumes_abandoned_record() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.set_completion_percentage(30);
        record.abandon();
        assert!(record.is_abandoned());

        record.set_completion_percentage(40);
        assert_eq!(record.status, ProgressStatus::InProgress);
    }

    #[test]
    fn partial_update_reopens_completed_record() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.set_completion_percentage(100);
        assert!(record.is_completed());

        record.set_completion_percentage(60);
        assert_eq!(record.status, ProgressStatus::InProgress);
        assert!(record.completed_at.is_none());

        // Coming back to 100 stamps a fresh completion
        record.set_completion_percentage(100);
        assert!(record.is_completed());
        assert!(record.completed_at.is_some());
    }

    #[test]
    fn zero_percentage_does_not_change_status() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.abandon();
        record.set_completion_percentage(0);
        assert!(record.is_abandoned());
    }

    #[test]
    fn reset_clears_everything_but_attempts() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.start();
        record.set_completion_percentage(100);
        record.add_time_spent(45);
        record.notes = Some("solved the buffer overflow".to_string());

        record.reset();
        assert_eq!(record.status, ProgressStatus::NotStarted);
        assert_eq!(record.completion_percentage, 0);
        assert_eq!(record.time_spent_minutes, 0);
        assert!(record.notes.is_none());
        assert!(record.started_at.is_none());
        assert!(record.completed_at.is_none());
        assert_eq!(record.attempts_count, 1);

        // Restart counts a fresh attempt
        record.start();
        assert_eq!(record.attempts_count, 2);
    }

    #[test]
    fn time_spent_accumulates_monotonically() {
        let mut record = ProgressRecord::new(UserId::new(), LabId::new());
        record.add_time_spent(10);
        record.add_time_spent(25);
        assert_eq!(record.time_spent_minutes, 35);

        record.add_time_spent(u32::MAX);
        assert_eq!(record.time_spent_minutes, u32::MAX);
    }
}
