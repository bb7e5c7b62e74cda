//! Report lifecycle service.

use std::sync::Arc;

use async_trait::async_trait;
use labhub_core::{
    Actor, CoreError, Report, ReportFilter, ReportId, ReportReason, ReportStatus, ReportTarget,
    Result, UserId, MAX_DETAILS_LEN,
};
use labhub_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::stats::{ReportPeriodStats, ReportStats};
use crate::sync::TargetCounters;

/// Administrative action applied to a batch of reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    /// Close with action taken
    Resolve,
    /// Close without action
    Dismiss,
    /// Keep open for senior attention
    Escalate,
}

impl ReportAction {
    /// Parse a caller-supplied action name. Unknown names yield `None`;
    /// batch processing treats that as "nothing to do", not an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "resolve" => Some(ReportAction::Resolve),
            "dismiss" => Some(ReportAction::Dismiss),
            "escalate" => Some(ReportAction::Escalate),
            _ => None,
        }
    }
}

/// Content moderation service.
///
/// Reports are created by any authenticated non-owner of the target;
/// everything after creation is admin-only. Lifecycle transitions never
/// delete a report.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// File a report against a target.
    ///
    /// Rejected with a conflict if the reporter owns the target or already
    /// has an active report against it. On success the target's report
    /// counters are bumped.
    async fn create_report(
        &self,
        reporter: Actor,
        target: ReportTarget,
        reason: ReportReason,
        details: Option<String>,
    ) -> Result<Report>;

    /// Move a pending report under review.
    async fn begin_review(&self, actor: Actor, report_id: ReportId) -> Result<Report>;

    /// Close a report as resolved, then resync the target's counters.
    async fn resolve_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        resolution: String,
    ) -> Result<Report>;

    /// Close a report as dismissed, then resync the target's counters.
    async fn dismiss_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        reason: String,
    ) -> Result<Report>;

    /// Escalate a report. It stays in the active set, so counters are
    /// untouched.
    async fn escalate_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        notes: String,
    ) -> Result<Report>;

    /// Apply one action across a set of reports.
    ///
    /// Items are processed independently; one failure does not roll back the
    /// others. Returns how many reports were actually processed. An unknown
    /// action name processes nothing.
    async fn batch_action(
        &self,
        actor: Actor,
        report_ids: &[ReportId],
        action: &str,
        notes: String,
    ) -> Result<usize>;

    /// Moderation removal of reported content: the report is resolved first
    /// (preserving the audit trail), then the post/comment is hard-deleted.
    /// User targets are rejected; accounts are not deleted here.
    async fn remove_reported_content(
        &self,
        actor: Actor,
        report_id: ReportId,
        resolution: String,
    ) -> Result<Report>;

    /// Administrative hard delete of a report record, outside the normal
    /// lifecycle. Target counters are resynced afterwards.
    async fn delete_report(&self, actor: Actor, report_id: ReportId) -> Result<()>;

    /// Load a report by id.
    async fn find_by_id(&self, report_id: ReportId) -> Result<Report>;

    /// Pending reports, oldest first.
    async fn pending_reports(&self) -> Result<Vec<Report>>;

    /// Reports in one state, newest first.
    async fn reports_by_status(&self, status: ReportStatus) -> Result<Vec<Report>>;

    /// Reports filed by one user, newest first.
    async fn reports_by_reporter(&self, reporter: UserId) -> Result<Vec<Report>>;

    /// All reports against one target, newest first.
    async fn reports_for_target(&self, target: ReportTarget) -> Result<Vec<Report>>;

    /// Reports filed in the last `days` days, newest first, capped at
    /// `limit`.
    async fn recent_reports(&self, days: i64, limit: usize) -> Result<Vec<Report>>;

    /// Whether `reporter` may file a report against `target` right now.
    async fn can_report(&self, reporter: UserId, target: ReportTarget) -> Result<bool>;

    /// Totals by lifecycle state.
    async fn statistics(&self) -> Result<ReportStats>;

    /// Report volume over the last week and month.
    async fn period_statistics(&self) -> Result<ReportPeriodStats>;
}

/// Basic report service implementation over a storage backend.
pub struct BasicReportService<S: Storage> {
    storage: Arc<Mutex<S>>,
    counters: TargetCounters<S>,
}

impl<S: Storage> BasicReportService<S> {
    /// Create a service owning its storage.
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(Mutex::new(storage)))
    }

    /// Create a service over a storage handle shared with other services.
    pub fn from_shared(storage: Arc<Mutex<S>>) -> Self {
        let counters = TargetCounters::new(Arc::clone(&storage));
        Self { storage, counters }
    }

    /// The counter sync handle bound to this service's storage.
    pub fn counters(&self) -> TargetCounters<S> {
        self.counters.clone()
    }

    fn require_admin(actor: Actor, action: &str) -> Result<()> {
        if !actor.is_admin() {
            warn!(actor = %actor.id, action, "admin check failed");
            return Err(CoreError::Permission(format!(
                "only admins can {action} reports"
            )));
        }
        Ok(())
    }

    /// Load a report and reject transitions out of a closed state.
    async fn load_open_report(&self, storage: &S, report_id: ReportId) -> Result<Report> {
        let report = storage
            .load_report(report_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("report {report_id}")))?;

        if report.status.is_terminal() {
            return Err(CoreError::Validation(format!(
                "report {report_id} is already closed as {}",
                report.status
            )));
        }
        Ok(report)
    }
}

#[async_trait]
impl<S: Storage + 'static> ReportService for BasicReportService<S> {
    async fn create_report(
        &self,
        reporter: Actor,
        target: ReportTarget,
        reason: ReportReason,
        details: Option<String>,
    ) -> Result<Report> {
        if let Some(details) = &details {
            if details.chars().count() > MAX_DETAILS_LEN {
                return Err(CoreError::Validation(format!(
                    "additional details must not exceed {MAX_DETAILS_LEN} characters"
                )));
            }
        }

        let report = {
            let mut storage = self.storage.lock().await;

            // Target must exist, and you cannot report your own content
            match target {
                ReportTarget::Post(id) => {
                    let post = storage
                        .load_post(id)
                        .await?
                        .ok_or_else(|| CoreError::NotFound(format!("post {id}")))?;
                    if post.is_authored_by(reporter.id) {
                        return Err(CoreError::Conflict(
                            "you cannot report your own post".to_string(),
                        ));
                    }
                }
                ReportTarget::Comment(id) => {
                    let comment = storage
                        .load_comment(id)
                        .await?
                        .ok_or_else(|| CoreError::NotFound(format!("comment {id}")))?;
                    if comment.is_authored_by(reporter.id) {
                        return Err(CoreError::Conflict(
                            "you cannot report your own comment".to_string(),
                        ));
                    }
                }
                ReportTarget::User(id) => {
                    if id == reporter.id {
                        return Err(CoreError::Conflict(
                            "you cannot report yourself".to_string(),
                        ));
                    }
                }
            }

            // One active report per (target, reporter)
            let duplicates = storage
                .list_reports(&ReportFilter {
                    target: Some(target),
                    reported_by: Some(reporter.id),
                    active_only: true,
                    ..Default::default()
                })
                .await?;
            if !duplicates.is_empty() {
                return Err(CoreError::Conflict(format!(
                    "you already have an open report against this {}",
                    target.kind()
                )));
            }

            let report = Report::new(target, reporter.id, reason, details);
            storage.save_report(&report).await?;
            report
        };

        self.counters.on_report_created(target).await?;
        debug!(report = %report.id, subject = %target, reason = %reason, "report filed");
        Ok(report)
    }

    async fn begin_review(&self, actor: Actor, report_id: ReportId) -> Result<Report> {
        Self::require_admin(actor, "review")?;

        let mut storage = self.storage.lock().await;
        let mut report = self.load_open_report(&storage, report_id).await?;
        if report.status != ReportStatus::Pending {
            return Err(CoreError::Validation(format!(
                "only a pending report can move under review, this one is {}",
                report.status
            )));
        }

        report.begin_review(actor.id);
        storage.save_report(&report).await?;
        Ok(report)
    }

    async fn resolve_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        resolution: String,
    ) -> Result<Report> {
        Self::require_admin(actor, "resolve")?;

        let report = {
            let mut storage = self.storage.lock().await;
            let mut report = self.load_open_report(&storage, report_id).await?;
            report.resolve(actor.id, resolution);
            storage.save_report(&report).await?;
            report
        };

        self.counters.resync(report.target).await?;
        debug!(report = %report_id, admin = %actor.id, "report resolved");
        Ok(report)
    }

    async fn dismiss_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        reason: String,
    ) -> Result<Report> {
        Self::require_admin(actor, "dismiss")?;

        let report = {
            let mut storage = self.storage.lock().await;
            let mut report = self.load_open_report(&storage, report_id).await?;
            report.dismiss(actor.id, reason);
            storage.save_report(&report).await?;
            report
        };

        self.counters.resync(report.target).await?;
        debug!(report = %report_id, admin = %actor.id, "report dismissed");
        Ok(report)
    }

    async fn escalate_report(
        &self,
        actor: Actor,
        report_id: ReportId,
        notes: String,
    ) -> Result<Report> {
        Self::require_admin(actor, "escalate")?;

        let mut storage = self.storage.lock().await;
        let mut report = self.load_open_report(&storage, report_id).await?;
        report.escalate(actor.id, notes);
        storage.save_report(&report).await?;
        debug!(report = %report_id, admin = %actor.id, "report escalated");
        Ok(report)
    }

    async fn batch_action(
        &self,
        actor: Actor,
        report_ids: &[ReportId],
        action: &str,
        notes: String,
    ) -> Result<usize> {
        Self::require_admin(actor, "batch-process")?;

        let Some(action) = ReportAction::parse(action) else {
            warn!(action, "unknown batch action, nothing processed");
            return Ok(0);
        };

        let mut processed = 0;
        for &report_id in report_ids {
            let result = match action {
                ReportAction::Resolve => {
                    self.resolve_report(actor, report_id, notes.clone()).await
                }
                ReportAction::Dismiss => {
                    self.dismiss_report(actor, report_id, notes.clone()).await
                }
                ReportAction::Escalate => {
                    self.escalate_report(actor, report_id, notes.clone()).await
                }
            };

            match result {
                Ok(_) => processed += 1,
                Err(err) => {
                    debug!(report = %report_id, %err, "batch item skipped");
                }
            }
        }

        Ok(processed)
    }

    async fn remove_reported_content(
        &self,
        actor: Actor,
        report_id: ReportId,
        resolution: String,
    ) -> Result<Report> {
        Self::require_admin(actor, "act on")?;

        let report = {
            let mut storage = self.storage.lock().await;
            let mut report = self.load_open_report(&storage, report_id).await?;

            if matches!(report.target, ReportTarget::User(_)) {
                return Err(CoreError::Validation(
                    "reported users cannot be removed as content".to_string(),
                ));
            }

            // Resolve first so the audit trail survives the deletion
            report.resolve(actor.id, resolution);
            storage.save_report(&report).await?;

            match report.target {
                ReportTarget::Post(id) => storage.delete_post(id).await?,
                ReportTarget::Comment(id) => storage.delete_comment(id).await?,
                ReportTarget::User(_) => unreachable!("rejected above"),
            }
            report
        };

        self.counters.resync(report.target).await?;
        debug!(report = %report_id, subject = %report.target, "reported content removed");
        Ok(report)
    }

    async fn delete_report(&self, actor: Actor, report_id: ReportId) -> Result<()> {
        Self::require_admin(actor, "delete")?;

        let target = {
            let mut storage = self.storage.lock().await;
            let report = storage
                .load_report(report_id)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("report {report_id}")))?;
            storage.delete_report(report_id).await?;
            report.target
        };

        self.counters.resync(target).await?;
        debug!(report = %report_id, admin = %actor.id, "report deleted");
        Ok(())
    }

    async fn find_by_id(&self, report_id: ReportId) -> Result<Report> {
        let storage = self.storage.lock().await;
        storage
            .load_report(report_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("report {report_id}")))
    }

    async fn pending_reports(&self) -> Result<Vec<Report>> {
        let storage = self.storage.lock().await;
        let mut reports = storage
            .list_reports(&ReportFilter {
                status: Some(ReportStatus::Pending),
                ..Default::default()
            })
            .await?;
        reports.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reports)
    }

    async fn reports_by_status(&self, status: ReportStatus) -> Result<Vec<Report>> {
        let storage = self.storage.lock().await;
        let mut reports = storage
            .list_reports(&ReportFilter {
                status: Some(status),
                ..Default::default()
            })
            .await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn reports_by_reporter(&self, reporter: UserId) -> Result<Vec<Report>> {
        let storage = self.storage.lock().await;
        let mut reports = storage
            .list_reports(&ReportFilter {
                reported_by: Some(reporter),
                ..Default::default()
            })
            .await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn reports_for_target(&self, target: ReportTarget) -> Result<Vec<Report>> {
        let storage = self.storage.lock().await;
        let mut reports = storage
            .list_reports(&ReportFilter {
                target: Some(target),
                ..Default::default()
            })
            .await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn recent_reports(&self, days: i64, limit: usize) -> Result<Vec<Report>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let storage = self.storage.lock().await;
        let mut reports = storage.list_reports(&ReportFilter::default()).await?;
        reports.retain(|r| r.created_at >= cutoff);
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(limit);
        Ok(reports)
    }

    async fn can_report(&self, reporter: UserId, target: ReportTarget) -> Result<bool> {
        let storage = self.storage.lock().await;

        let owns_target = match target {
            ReportTarget::Post(id) => match storage.load_post(id).await? {
                Some(post) => post.is_authored_by(reporter),
                None => return Ok(false),
            },
            ReportTarget::Comment(id) => match storage.load_comment(id).await? {
                Some(comment) => comment.is_authored_by(reporter),
                None => return Ok(false),
            },
            ReportTarget::User(id) => id == reporter,
        };
        if owns_target {
            return Ok(false);
        }

        let duplicates = storage
            .list_reports(&ReportFilter {
                target: Some(target),
                reported_by: Some(reporter),
                active_only: true,
                ..Default::default()
            })
            .await?;
        Ok(duplicates.is_empty())
    }

    async fn statistics(&self) -> Result<ReportStats> {
        let storage = self.storage.lock().await;
        let reports = storage.list_reports(&ReportFilter::default()).await?;

        let count = |status: ReportStatus| {
            reports.iter().filter(|r| r.status == status).count() as u64
        };

        Ok(ReportStats {
            total: reports.len() as u64,
            pending: count(ReportStatus::Pending),
            under_review: count(ReportStatus::UnderReview),
            resolved: count(ReportStatus::Resolved),
            dismissed: count(ReportStatus::Dismissed),
            escalated: count(ReportStatus::Escalated),
        })
    }

    async fn period_statistics(&self) -> Result<ReportPeriodStats> {
        let storage = self.storage.lock().await;
        let reports = storage.list_reports(&ReportFilter::default()).await?;

        let week_ago = chrono::Utc::now() - chrono::Duration::weeks(1);
        let month_ago = chrono::Utc::now() - chrono::Duration::days(30);

        Ok(ReportPeriodStats {
            reports_this_week: reports.iter().filter(|r| r.created_at >= week_ago).count()
                as u64,
            reports_this_month: reports
                .iter()
                .filter(|r| r.created_at >= month_ago)
                .count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labhub_core::{Comment, Post, PostId};
    use labhub_storage::MemoryStorage;

    struct Fixture {
        service: BasicReportService<MemoryStorage>,
        storage: Arc<Mutex<MemoryStorage>>,
        author: UserId,
        post: PostId,
        comment: labhub_core::CommentId,
    }

    async fn fixture() -> Fixture {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let author = UserId::new();

        let post = Post::new(author, "Intro to reverse engineering");
        let comment = Comment::new(post.id, author);
        {
            let mut guard = storage.lock().await;
            guard.save_post(&post).await.unwrap();
            guard.save_comment(&comment).await.unwrap();
        }

        Fixture {
            service: BasicReportService::from_shared(Arc::clone(&storage)),
            storage,
            author,
            post: post.id,
            comment: comment.id,
        }
    }

    #[tokio::test]
    async fn self_report_is_rejected() {
        let fx = fixture().await;
        let author = Actor::member(fx.author);

        let err = fx
            .service
            .create_report(author, ReportTarget::Post(fx.post), ReportReason::Spam, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        let err = fx
            .service
            .create_report(
                author,
                ReportTarget::User(fx.author),
                ReportReason::Harassment,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_active_report_is_rejected() {
        let fx = fixture().await;
        let reporter = Actor::member(UserId::new());
        let target = ReportTarget::Post(fx.post);

        fx.service
            .create_report(reporter, target, ReportReason::Spam, None)
            .await
            .unwrap();

        let err = fx
            .service
            .create_report(reporter, target, ReportReason::Spam, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn dismissal_reopens_the_right_to_report() {
        let fx = fixture().await;
        let reporter = Actor::member(UserId::new());
        let admin = Actor::admin(UserId::new());
        let target = ReportTarget::Post(fx.post);

        let report = fx
            .service
            .create_report(reporter, target, ReportReason::Spam, None)
            .await
            .unwrap();
        fx.service
            .dismiss_report(admin, report.id, "not spam".to_string())
            .await
            .unwrap();

        // The old report is closed, so a new one is allowed
        assert!(fx.service.can_report(reporter.id, target).await.unwrap());
        fx.service
            .create_report(reporter, target, ReportReason::Spam, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn details_length_is_validated() {
        let fx = fixture().await;
        let reporter = Actor::member(UserId::new());

        let err = fx
            .service
            .create_report(
                reporter,
                ReportTarget::Post(fx.post),
                ReportReason::Other,
                Some("x".repeat(MAX_DETAILS_LEN + 1)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn review_actions_require_admin() {
        let fx = fixture().await;
        let reporter = Actor::member(UserId::new());
        let report = fx
            .service
            .create_report(
                reporter,
                ReportTarget::Post(fx.post),
                ReportReason::Spam,
                None,
            )
            .await
            .unwrap();

        let err = fx
            .service
            .resolve_report(reporter, report.id, "done".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Permission(_)));

        let err = fx
            .service
            .escalate_report(reporter, report.id, "up".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Permission(_)));
    }

    #[tokio::test]
    async fn counters_follow_the_two_reporter_scenario() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let alice = Actor::member(UserId::new());
        let bob = Actor::member(UserId::new());
        let target = ReportTarget::Comment(fx.comment);

        let a = fx
            .service
            .create_report(alice, target, ReportReason::Harassment, None)
            .await
            .unwrap();
        let b = fx
            .service
            .create_report(bob, target, ReportReason::HateSpeech, None)
            .await
            .unwrap();

        let comment = fx
            .storage
            .lock()
            .await
            .load_comment(fx.comment)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(comment.report_count, 2);
        assert!(comment.is_reported);

        fx.service
            .dismiss_report(admin, a.id, "first look".to_string())
            .await
            .unwrap();
        let comment = fx
            .storage
            .lock()
            .await
            .load_comment(fx.comment)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(comment.report_count, 1);
        assert!(comment.is_reported);

        fx.service
            .dismiss_report(admin, b.id, "second look".to_string())
            .await
            .unwrap();
        let comment = fx
            .storage
            .lock()
            .await
            .load_comment(fx.comment)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(comment.report_count, 0);
        assert!(!comment.is_reported);
    }

    #[tokio::test]
    async fn escalation_keeps_the_report_counted() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let reporter = Actor::member(UserId::new());
        let target = ReportTarget::Post(fx.post);

        let report = fx
            .service
            .create_report(reporter, target, ReportReason::MaliciousCode, None)
            .await
            .unwrap();
        fx.service
            .escalate_report(admin, report.id, "needs a second opinion".to_string())
            .await
            .unwrap();

        let post = fx
            .storage
            .lock()
            .await
            .load_post(fx.post)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.report_count, 1);
        assert!(post.is_reported);
    }

    #[tokio::test]
    async fn resolution_removes_report_from_active_set() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let reporter = Actor::member(UserId::new());
        let target = ReportTarget::Post(fx.post);

        let report = fx
            .service
            .create_report(reporter, target, ReportReason::Spam, None)
            .await
            .unwrap();
        fx.service
            .resolve_report(admin, report.id, "author warned".to_string())
            .await
            .unwrap();

        let post = fx
            .storage
            .lock()
            .await
            .load_post(fx.post)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.report_count, 0);
        assert!(!post.is_reported);

        // Closed reports cannot be acted on again
        let err = fx
            .service
            .dismiss_report(admin, report.id, "again".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn batch_action_isolates_failures() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let alice = Actor::member(UserId::new());
        let bob = Actor::member(UserId::new());

        let a = fx
            .service
            .create_report(
                alice,
                ReportTarget::Post(fx.post),
                ReportReason::Spam,
                None,
            )
            .await
            .unwrap();
        let b = fx
            .service
            .create_report(
                bob,
                ReportTarget::Comment(fx.comment),
                ReportReason::Spam,
                None,
            )
            .await
            .unwrap();

        let ids = [a.id, ReportId::new(), b.id];
        let processed = fx
            .service
            .batch_action(admin, &ids, "dismiss", "sweep".to_string())
            .await
            .unwrap();
        assert_eq!(processed, 2);

        let processed = fx
            .service
            .batch_action(admin, &ids, "defenestrate", "??".to_string())
            .await
            .unwrap();
        assert_eq!(processed, 0);
    }

    #[tokio::test]
    async fn content_removal_resolves_then_deletes() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let reporter = Actor::member(UserId::new());

        let report = fx
            .service
            .create_report(
                reporter,
                ReportTarget::Comment(fx.comment),
                ReportReason::IllegalContent,
                None,
            )
            .await
            .unwrap();

        let resolved = fx
            .service
            .remove_reported_content(admin, report.id, "content taken down".to_string())
            .await
            .unwrap();
        assert_eq!(resolved.status, ReportStatus::Resolved);

        // The audit trail survives, the content does not
        assert!(fx.service.find_by_id(report.id).await.is_ok());
        assert!(fx
            .storage
            .lock()
            .await
            .load_comment(fx.comment)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn user_reports_have_no_denormalized_counters() {
        let fx = fixture().await;
        let reporter = Actor::member(UserId::new());
        let reported = UserId::new();

        let report = fx
            .service
            .create_report(
                reporter,
                ReportTarget::User(reported),
                ReportReason::Harassment,
                Some("abusive DMs".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(report.status, ReportStatus::Pending);

        let against = fx
            .service
            .reports_for_target(ReportTarget::User(reported))
            .await
            .unwrap();
        assert_eq!(against.len(), 1);
    }

    #[tokio::test]
    async fn statistics_count_by_status() {
        let fx = fixture().await;
        let admin = Actor::admin(UserId::new());
        let alice = Actor::member(UserId::new());
        let bob = Actor::member(UserId::new());

        let a = fx
            .service
            .create_report(
                alice,
                ReportTarget::Post(fx.post),
                ReportReason::Spam,
                None,
            )
            .await
            .unwrap();
        fx.service
            .create_report(
                bob,
                ReportTarget::Comment(fx.comment),
                ReportReason::Spam,
                None,
            )
            .await
            .unwrap();
        fx.service
            .resolve_report(admin, a.id, "handled".to_string())
            .await
            .unwrap();

        let stats = fx.service.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.resolution_rate(), 50.0);

        let period = fx.service.period_statistics().await.unwrap();
        assert_eq!(period.reports_this_week, 2);
    }
}
