//! Denormalized report counters on posts and comments.
//!
//! `report_count`/`is_reported` are a materialized view over the active
//! reports against a target. Creation increments unconditionally; every exit
//! from the active set triggers a full recount against the authoritative
//! report set. A recount, not a decrement: several independent reports can
//! exist against one target, and concurrent moderation actions must converge
//! on the true count.

use std::sync::Arc;

use labhub_core::{ReportFilter, ReportTarget, Result};
use labhub_storage::Storage;
use tokio::sync::Mutex;
use tracing::debug;

/// Keeps target summary fields consistent with the report set.
pub struct TargetCounters<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> Clone for TargetCounters<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Storage> TargetCounters<S> {
    /// Create a sync handle over a shared storage handle.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Count one new report against `target`.
    ///
    /// User targets carry no denormalized counters; their active set is
    /// queried directly when needed.
    pub async fn on_report_created(&self, target: ReportTarget) -> Result<()> {
        let mut storage = self.storage.lock().await;
        match target {
            ReportTarget::Post(id) => {
                if let Some(mut post) = storage.load_post(id).await? {
                    post.flag_reported();
                    storage.save_post(&post).await?;
                    debug!(subject = %target, count = post.report_count, "report counted");
                }
            }
            ReportTarget::Comment(id) => {
                if let Some(mut comment) = storage.load_comment(id).await? {
                    comment.flag_reported();
                    storage.save_comment(&comment).await?;
                    debug!(subject = %target, count = comment.report_count, "report counted");
                }
            }
            ReportTarget::User(_) => {}
        }
        Ok(())
    }

    /// Recompute the target's summary from the active-report set.
    ///
    /// No-op for user targets and for targets that no longer exist (their
    /// counters are moot once the content is deleted).
    pub async fn resync(&self, target: ReportTarget) -> Result<()> {
        let mut storage = self.storage.lock().await;

        let active = storage
            .list_reports(&ReportFilter {
                target: Some(target),
                active_only: true,
                ..Default::default()
            })
            .await?
            .len() as u32;

        match target {
            ReportTarget::Post(id) => {
                if let Some(mut post) = storage.load_post(id).await? {
                    post.set_active_report_count(active);
                    storage.save_post(&post).await?;
                    debug!(subject = %target, count = active, "report counters resynced");
                }
            }
            ReportTarget::Comment(id) => {
                if let Some(mut comment) = storage.load_comment(id).await? {
                    comment.set_active_report_count(active);
                    storage.save_comment(&comment).await?;
                    debug!(subject = %target, count = active, "report counters resynced");
                }
            }
            ReportTarget::User(_) => {}
        }
        Ok(())
    }
}
