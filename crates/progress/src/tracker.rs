//! Progress tracking service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use labhub_core::{
    Actor, CoreError, LabId, ProgressFilter, ProgressId, ProgressRecord, ProgressStatus, Result,
    UserId,
};
use labhub_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::counters::LabCounters;
use crate::stats::{
    CompletionLeaderboardEntry, GlobalProgressStats, LabProgressStats, TimeLeaderboardEntry,
    UserProgressStats,
};

/// Progress tracking service.
///
/// Mutating operations take the acting user explicitly and enforce
/// ownership; nothing is partially applied on a validation failure.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Start a lab for the actor, creating the record on first start.
    ///
    /// Idempotent: repeated calls only refresh `last_accessed_at`. Missing
    /// or unpublished labs are reported as not found unless the actor is an
    /// admin.
    async fn start_lab(&self, actor: Actor, lab_id: LabId) -> Result<ProgressRecord>;

    /// Record a progress update on a previously started lab.
    ///
    /// Reaching 100% completes the record and counts the lab completion
    /// exactly once; later updates at 100% do not count again. A partial
    /// percentage returns the record to `InProgress`, resuming an abandoned
    /// lab implicitly.
    async fn update_progress(
        &self,
        actor: Actor,
        lab_id: LabId,
        percentage: u8,
        notes: Option<String>,
        additional_minutes: u32,
    ) -> Result<ProgressRecord>;

    /// Abandon an owned record. Percentage and time are kept.
    async fn abandon_lab(&self, actor: Actor, progress_id: ProgressId) -> Result<ProgressRecord>;

    /// Explicitly resume an owned, abandoned record.
    async fn resume_lab(&self, actor: Actor, progress_id: ProgressId) -> Result<ProgressRecord>;

    /// Reset an owned record back to `NotStarted`. The lab's historical
    /// completion count is untouched.
    async fn reset_progress(&self, actor: Actor, progress_id: ProgressId)
        -> Result<ProgressRecord>;

    /// Hard-delete a record; owner or admin only.
    async fn delete_progress(&self, actor: Actor, progress_id: ProgressId) -> Result<()>;

    /// Load a record by id.
    async fn find_by_id(&self, progress_id: ProgressId) -> Result<ProgressRecord>;

    /// Load the unique record for a `(user, lab)` pair.
    async fn find_by_user_and_lab(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>>;

    /// All of a user's records, most recently accessed first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRecord>>;

    /// A user's records in one status, most recently accessed first.
    async fn list_for_user_by_status(
        &self,
        user_id: UserId,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>>;

    /// All records for a lab, highest completion first.
    async fn list_for_lab(&self, lab_id: LabId) -> Result<Vec<ProgressRecord>>;

    /// A user's records touched in the last `days` days.
    async fn recent_activity(&self, user_id: UserId, days: i64) -> Result<Vec<ProgressRecord>>;

    /// Whether the user has completed the lab.
    async fn has_completed(&self, user_id: UserId, lab_id: LabId) -> Result<bool>;

    /// A user's records keyed by lab, for rendering lab lists.
    async fn progress_map(&self, user_id: UserId)
        -> Result<HashMap<LabId, ProgressRecord>>;

    /// Aggregated statistics for one user.
    async fn user_statistics(&self, user_id: UserId) -> Result<UserProgressStats>;

    /// Aggregated statistics for one lab.
    async fn lab_statistics(&self, lab_id: LabId) -> Result<LabProgressStats>;

    /// System-wide totals.
    async fn global_statistics(&self) -> Result<GlobalProgressStats>;

    /// Users ranked by completed labs.
    async fn completion_leaderboard(&self, limit: usize)
        -> Result<Vec<CompletionLeaderboardEntry>>;

    /// Users ranked by total time spent.
    async fn time_leaderboard(&self, limit: usize) -> Result<Vec<TimeLeaderboardEntry>>;
}

/// Basic progress tracker implementation over a storage backend.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<Mutex<S>>,
    counters: LabCounters<S>,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a tracker owning its storage.
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(Mutex::new(storage)))
    }

    /// Create a tracker over a storage handle shared with other services.
    pub fn from_shared(storage: Arc<Mutex<S>>) -> Self {
        let counters = LabCounters::new(Arc::clone(&storage));
        Self { storage, counters }
    }

    /// The lab counters bound to this tracker's storage.
    pub fn counters(&self) -> LabCounters<S> {
        self.counters.clone()
    }

    async fn load_owned_record(
        &self,
        actor: Actor,
        progress_id: ProgressId,
        action: &str,
    ) -> Result<ProgressRecord> {
        let storage = self.storage.lock().await;
        let record = storage
            .load_progress(progress_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("progress record {progress_id}")))?;

        if !record.is_owned_by(actor.id) {
            warn!(
                actor = %actor.id,
                record = %progress_id,
                action,
                "ownership check failed"
            );
            return Err(CoreError::Permission(format!(
                "only the owner can {action} this lab progress"
            )));
        }
        Ok(record)
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn start_lab(&self, actor: Actor, lab_id: LabId) -> Result<ProgressRecord> {
        let mut storage = self.storage.lock().await;

        let lab = storage
            .load_lab(lab_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("lab {lab_id}")))?;

        // Unpublished labs are invisible to members
        if !lab.is_published && !actor.is_admin() {
            return Err(CoreError::NotFound(format!("lab {lab_id}")));
        }

        let mut record = match storage.find_progress(actor.id, lab_id).await? {
            Some(existing) => existing,
            None => ProgressRecord::new(actor.id, lab_id),
        };

        record.start();
        storage.save_progress(&record).await?;
        debug!(user = %actor.id, lab = %lab_id, status = %record.status, "lab started");
        Ok(record)
    }

    async fn update_progress(
        &self,
        actor: Actor,
        lab_id: LabId,
        percentage: u8,
        notes: Option<String>,
        additional_minutes: u32,
    ) -> Result<ProgressRecord> {
        if percentage > 100 {
            return Err(CoreError::Validation(format!(
                "completion percentage must be between 0 and 100, got {percentage}"
            )));
        }

        let (record, newly_completed) = {
            let mut storage = self.storage.lock().await;

            let mut record = storage.find_progress(actor.id, lab_id).await?.ok_or_else(|| {
                CoreError::Validation(format!(
                    "no progress for lab {lab_id}: the lab must be started first"
                ))
            })?;

            let was_completed = record.is_completed();

            if let Some(notes) = notes {
                let trimmed = notes.trim();
                if !trimmed.is_empty() {
                    record.notes = Some(trimmed.to_string());
                }
            }
            if additional_minutes > 0 {
                record.add_time_spent(additional_minutes);
            }
            record.set_completion_percentage(percentage);
            record.touch();

            storage.save_progress(&record).await?;
            let newly_completed = record.is_completed() && !was_completed;
            (record, newly_completed)
        };

        // Counter fires only after the record transition is saved, and only
        // on the genuine completion event
        if newly_completed {
            self.counters.record_completion(lab_id).await?;
            debug!(user = %actor.id, lab = %lab_id, "lab completed");
        }

        Ok(record)
    }

    async fn abandon_lab(&self, actor: Actor, progress_id: ProgressId) -> Result<ProgressRecord> {
        let mut record = self.load_owned_record(actor, progress_id, "abandon").await?;
        record.abandon();

        let mut storage = self.storage.lock().await;
        storage.save_progress(&record).await?;
        debug!(user = %actor.id, record = %progress_id, "lab abandoned");
        Ok(record)
    }

    async fn resume_lab(&self, actor: Actor, progress_id: ProgressId) -> Result<ProgressRecord> {
        let mut record = self.load_owned_record(actor, progress_id, "resume").await?;
        if !record.is_abandoned() {
            return Err(CoreError::Validation(
                "only an abandoned lab can be resumed".to_string(),
            ));
        }
        record.resume();

        let mut storage = self.storage.lock().await;
        storage.save_progress(&record).await?;
        Ok(record)
    }

    async fn reset_progress(
        &self,
        actor: Actor,
        progress_id: ProgressId,
    ) -> Result<ProgressRecord> {
        let mut record = self.load_owned_record(actor, progress_id, "reset").await?;
        record.reset();

        let mut storage = self.storage.lock().await;
        storage.save_progress(&record).await?;
        debug!(user = %actor.id, record = %progress_id, "progress reset");
        Ok(record)
    }

    async fn delete_progress(&self, actor: Actor, progress_id: ProgressId) -> Result<()> {
        let mut storage = self.storage.lock().await;
        let record = storage
            .load_progress(progress_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("progress record {progress_id}")))?;

        if !actor.is_admin() && !record.is_owned_by(actor.id) {
            return Err(CoreError::Permission(
                "only the owner or an admin can delete progress".to_string(),
            ));
        }

        storage.delete_progress(progress_id).await?;
        debug!(actor = %actor.id, record = %progress_id, "progress deleted");
        Ok(())
    }

    async fn find_by_id(&self, progress_id: ProgressId) -> Result<ProgressRecord> {
        let storage = self.storage.lock().await;
        storage
            .load_progress(progress_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("progress record {progress_id}")))
    }

    async fn find_by_user_and_lab(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>> {
        let storage = self.storage.lock().await;
        Ok(storage.find_progress(user_id, lab_id).await?)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRecord>> {
        let storage = self.storage.lock().await;
        let mut records = storage
            .list_progress(&ProgressFilter {
                user_id: Some(user_id),
                ..Default::default()
            })
            .await?;
        records.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
        Ok(records)
    }

    async fn list_for_user_by_status(
        &self,
        user_id: UserId,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>> {
        let storage = self.storage.lock().await;
        let mut records = storage
            .list_progress(&ProgressFilter {
                user_id: Some(user_id),
                status: Some(status),
                ..Default::default()
            })
            .await?;
        records.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
        Ok(records)
    }

    async fn list_for_lab(&self, lab_id: LabId) -> Result<Vec<ProgressRecord>> {
        let storage = self.storage.lock().await;
        let mut records = storage
            .list_progress(&ProgressFilter {
                lab_id: Some(lab_id),
                ..Default::default()
            })
            .await?;
        records.sort_by(|a, b| b.completion_percentage.cmp(&a.completion_percentage));
        Ok(records)
    }

    async fn recent_activity(&self, user_id: UserId, days: i64) -> Result<Vec<ProgressRecord>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let mut records = self.list_for_user(user_id).await?;
        records.retain(|r| r.last_accessed_at >= cutoff);
        Ok(records)
    }

    async fn has_completed(&self, user_id: UserId, lab_id: LabId) -> Result<bool> {
        let storage = self.storage.lock().await;
        Ok(storage
            .find_progress(user_id, lab_id)
            .await?
            .map(|r| r.is_completed())
            .unwrap_or(false))
    }

    async fn progress_map(
        &self,
        user_id: UserId,
    ) -> Result<HashMap<LabId, ProgressRecord>> {
        let records = self.list_for_user(user_id).await?;
        Ok(records.into_iter().map(|r| (r.lab_id, r)).collect())
    }

    async fn user_statistics(&self, user_id: UserId) -> Result<UserProgressStats> {
        let records = self.list_for_user(user_id).await?;

        let total_started = records.len() as u64;
        let completed = records.iter().filter(|r| r.is_completed()).count() as u64;
        let in_progress = records.iter().filter(|r| r.is_in_progress()).count() as u64;
        let abandoned = records.iter().filter(|r| r.is_abandoned()).count() as u64;
        let total_time_minutes = records
            .iter()
            .map(|r| r.time_spent_minutes as u64)
            .sum();
        let average_completion = if records.is_empty() {
            0.0
        } else {
            records
                .iter()
                .map(|r| r.completion_percentage as f64)
                .sum::<f64>()
                / records.len() as f64
        };

        Ok(UserProgressStats {
            total_started,
            completed,
            in_progress,
            abandoned,
            total_time_minutes,
            average_completion,
        })
    }

    async fn lab_statistics(&self, lab_id: LabId) -> Result<LabProgressStats> {
        let records = self.list_for_lab(lab_id).await?;

        let total_users = records.len() as u64;
        let completions = records.iter().filter(|r| r.is_completed()).count() as u64;
        let completion_rate = if total_users == 0 {
            0.0
        } else {
            completions as f64 / total_users as f64 * 100.0
        };
        let (average_time_minutes, average_completion) = if records.is_empty() {
            (0.0, 0.0)
        } else {
            (
                records
                    .iter()
                    .map(|r| r.time_spent_minutes as f64)
                    .sum::<f64>()
                    / records.len() as f64,
                records
                    .iter()
                    .map(|r| r.completion_percentage as f64)
                    .sum::<f64>()
                    / records.len() as f64,
            )
        };

        Ok(LabProgressStats {
            total_users,
            completions,
            completion_rate,
            average_time_minutes,
            average_completion,
        })
    }

    async fn global_statistics(&self) -> Result<GlobalProgressStats> {
        let storage = self.storage.lock().await;
        let records = storage.list_progress(&ProgressFilter::default()).await?;

        let one_week_ago = chrono::Utc::now() - chrono::Duration::weeks(1);

        Ok(GlobalProgressStats {
            total_records: records.len() as u64,
            completed: records.iter().filter(|r| r.is_completed()).count() as u64,
            in_progress: records.iter().filter(|r| r.is_in_progress()).count() as u64,
            abandoned: records.iter().filter(|r| r.is_abandoned()).count() as u64,
            recent_activity: records
                .iter()
                .filter(|r| r.last_accessed_at >= one_week_ago)
                .count() as u64,
        })
    }

    async fn completion_leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<CompletionLeaderboardEntry>> {
        let storage = self.storage.lock().await;
        let records = storage
            .list_progress(&ProgressFilter {
                status: Some(ProgressStatus::Completed),
                ..Default::default()
            })
            .await?;

        let mut by_user: HashMap<UserId, u64> = HashMap::new();
        for record in &records {
            *by_user.entry(record.user_id).or_insert(0) += 1;
        }

        let mut entries: Vec<CompletionLeaderboardEntry> = by_user
            .into_iter()
            .map(|(user_id, completed_labs)| CompletionLeaderboardEntry {
                user_id,
                completed_labs,
            })
            .collect();
        entries.sort_by(|a, b| b.completed_labs.cmp(&a.completed_labs));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn time_leaderboard(&self, limit: usize) -> Result<Vec<TimeLeaderboardEntry>> {
        let storage = self.storage.lock().await;
        let records = storage.list_progress(&ProgressFilter::default()).await?;

        let mut by_user: HashMap<UserId, u64> = HashMap::new();
        for record in &records {
            *by_user.entry(record.user_id).or_insert(0) += record.time_spent_minutes as u64;
        }

        let mut entries: Vec<TimeLeaderboardEntry> = by_user
            .into_iter()
            .map(|(user_id, total_minutes)| TimeLeaderboardEntry {
                user_id,
                total_minutes,
            })
            .collect();
        entries.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labhub_core::Lab;
    use labhub_storage::MemoryStorage;

    async fn tracker_with_lab(
        published: bool,
    ) -> (BasicProgressTracker<MemoryStorage>, Arc<Mutex<MemoryStorage>>, LabId) {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let mut lab = Lab::new("Stack smashing for fun", UserId::new());
        lab.is_published = published;
        let lab_id = lab.id;
        storage.lock().await.save_lab(&lab).await.unwrap();
        (
            BasicProgressTracker::from_shared(Arc::clone(&storage)),
            storage,
            lab_id,
        )
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        let first = tracker.start_lab(user, lab_id).await.unwrap();
        assert_eq!(first.status, ProgressStatus::InProgress);

        let second = tracker.start_lab(user, lab_id).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.attempts_count, 1);

        let records = tracker.list_for_user(user.id).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn unpublished_lab_is_hidden_from_members() {
        let (tracker, _storage, lab_id) = tracker_with_lab(false).await;

        let member = Actor::member(UserId::new());
        let err = tracker.start_lab(member, lab_id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        let admin = Actor::admin(UserId::new());
        assert!(tracker.start_lab(admin, lab_id).await.is_ok());
    }

    #[tokio::test]
    async fn update_requires_a_started_lab() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        let err = tracker
            .update_progress(user, lab_id, 50, None, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_percentage() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());
        tracker.start_lab(user, lab_id).await.unwrap();

        let err = tracker
            .update_progress(user, lab_id, 101, None, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn completion_counts_exactly_once() {
        let (tracker, storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());
        tracker.start_lab(user, lab_id).await.unwrap();

        let halfway = tracker
            .update_progress(user, lab_id, 50, None, 30)
            .await
            .unwrap();
        assert_eq!(halfway.status, ProgressStatus::InProgress);
        assert_eq!(halfway.time_spent_minutes, 30);

        let done = tracker
            .update_progress(user, lab_id, 100, None, 15)
            .await
            .unwrap();
        assert_eq!(done.status, ProgressStatus::Completed);
        assert_eq!(done.time_spent_minutes, 45);

        // Updating at 100% again must not double-count
        tracker
            .update_progress(user, lab_id, 100, None, 5)
            .await
            .unwrap();

        let lab = storage.lock().await.load_lab(lab_id).await.unwrap().unwrap();
        assert_eq!(lab.completion_count, 1);
    }

    #[tokio::test]
    async fn partial_update_resumes_abandoned_lab() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        let record = tracker.start_lab(user, lab_id).await.unwrap();
        tracker.abandon_lab(user, record.id).await.unwrap();

        let resumed = tracker
            .update_progress(user, lab_id, 40, None, 0)
            .await
            .unwrap();
        assert_eq!(resumed.status, ProgressStatus::InProgress);
        assert_eq!(resumed.completion_percentage, 40);
    }

    #[tokio::test]
    async fn abandon_requires_ownership() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let owner = Actor::member(UserId::new());
        let stranger = Actor::member(UserId::new());

        let record = tracker.start_lab(owner, lab_id).await.unwrap();
        let err = tracker.abandon_lab(stranger, record.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Permission(_)));
    }

    #[tokio::test]
    async fn resume_rejects_non_abandoned_records() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        let record = tracker.start_lab(user, lab_id).await.unwrap();
        let err = tracker.resume_lab(user, record.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn reset_keeps_historical_completion_count() {
        let (tracker, storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        let record = tracker.start_lab(user, lab_id).await.unwrap();
        tracker
            .update_progress(user, lab_id, 100, None, 60)
            .await
            .unwrap();

        let reset = tracker.reset_progress(user, record.id).await.unwrap();
        assert_eq!(reset.status, ProgressStatus::NotStarted);
        assert_eq!(reset.completion_percentage, 0);
        assert_eq!(reset.time_spent_minutes, 0);

        let lab = storage.lock().await.load_lab(lab_id).await.unwrap().unwrap();
        assert_eq!(lab.completion_count, 1);

        // Completing again after a reset is a new completion event
        tracker.start_lab(user, lab_id).await.unwrap();
        tracker
            .update_progress(user, lab_id, 100, None, 10)
            .await
            .unwrap();
        let lab = storage.lock().await.load_lab(lab_id).await.unwrap().unwrap();
        assert_eq!(lab.completion_count, 2);
    }

    #[tokio::test]
    async fn delete_allows_owner_and_admin_only() {
        let (tracker, _storage, lab_id) = tracker_with_lab(true).await;
        let owner = Actor::member(UserId::new());
        let stranger = Actor::member(UserId::new());
        let admin = Actor::admin(UserId::new());

        let record = tracker.start_lab(owner, lab_id).await.unwrap();
        let err = tracker
            .delete_progress(stranger, record.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Permission(_)));

        tracker.delete_progress(admin, record.id).await.unwrap();
        assert!(tracker
            .find_by_user_and_lab(owner.id, lab_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn statistics_aggregate_user_records() {
        let (tracker, storage, lab_id) = tracker_with_lab(true).await;
        let user = Actor::member(UserId::new());

        // A second lab so the user has a mixed record set
        let mut other = Lab::new("Forensics warm-up", UserId::new());
        other.is_published = true;
        let other_id = other.id;
        storage.lock().await.save_lab(&other).await.unwrap();

        tracker.start_lab(user, lab_id).await.unwrap();
        tracker
            .update_progress(user, lab_id, 100, None, 40)
            .await
            .unwrap();
        tracker.start_lab(user, other_id).await.unwrap();
        tracker
            .update_progress(user, other_id, 50, None, 20)
            .await
            .unwrap();

        let stats = tracker.user_statistics(user.id).await.unwrap();
        assert_eq!(stats.total_started, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.total_time_minutes, 60);
        assert_eq!(stats.average_completion, 75.0);
        assert_eq!(stats.completion_rate(), 50.0);

        let lab_stats = tracker.lab_statistics(lab_id).await.unwrap();
        assert_eq!(lab_stats.total_users, 1);
        assert_eq!(lab_stats.completions, 1);
        assert_eq!(lab_stats.completion_rate, 100.0);
    }

    #[tokio::test]
    async fn leaderboards_rank_users() {
        let (tracker, storage, lab_id) = tracker_with_lab(true).await;
        let fast = Actor::member(UserId::new());
        let slow = Actor::member(UserId::new());

        let mut other = Lab::new("Crypto challenge", UserId::new());
        other.is_published = true;
        let other_id = other.id;
        storage.lock().await.save_lab(&other).await.unwrap();

        for lab in [lab_id, other_id] {
            tracker.start_lab(fast, lab).await.unwrap();
            tracker
                .update_progress(fast, lab, 100, None, 10)
                .await
                .unwrap();
        }
        tracker.start_lab(slow, lab_id).await.unwrap();
        tracker
            .update_progress(slow, lab_id, 100, None, 90)
            .await
            .unwrap();

        let completions = tracker.completion_leaderboard(10).await.unwrap();
        assert_eq!(completions[0].user_id, fast.id);
        assert_eq!(completions[0].completed_labs, 2);

        let time = tracker.time_leaderboard(1).await.unwrap();
        assert_eq!(time.len(), 1);
        assert_eq!(time[0].user_id, slow.id);
        assert_eq!(time[0].total_minutes, 90);
    }
}
