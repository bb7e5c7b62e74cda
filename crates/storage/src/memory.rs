//! In-memory storage backend.
//!
//! Backs tests and ephemeral runs; nothing survives the process.

use std::collections::HashMap;

use async_trait::async_trait;
use labhub_core::{
    Comment, CommentId, Lab, LabId, Post, PostId, ProgressFilter, ProgressId, ProgressRecord,
    Report, ReportFilter, ReportId, UserId,
};

use super::trait_::{progress_matches, report_matches, Result, Storage};

/// HashMap-backed storage.
#[derive(Default)]
pub struct MemoryStorage {
    labs: HashMap<LabId, Lab>,
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
    progress: HashMap<ProgressId, ProgressRecord>,
    reports: HashMap<ReportId, Report>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_lab(&mut self, lab: &Lab) -> Result<()> {
        self.labs.insert(lab.id, lab.clone());
        Ok(())
    }

    async fn load_lab(&self, id: LabId) -> Result<Option<Lab>> {
        Ok(self.labs.get(&id).cloned())
    }

    async fn list_labs(&self) -> Result<Vec<Lab>> {
        Ok(self.labs.values().cloned().collect())
    }

    async fn save_post(&mut self, post: &Post) -> Result<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn load_post(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).cloned())
    }

    async fn delete_post(&mut self, id: PostId) -> Result<()> {
        self.posts.remove(&id);
        Ok(())
    }

    async fn save_comment(&mut self, comment: &Comment) -> Result<()> {
        self.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn load_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).cloned())
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<()> {
        self.comments.remove(&id);
        Ok(())
    }

    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()> {
        self.progress.insert(record.id, record.clone());
        Ok(())
    }

    async fn load_progress(&self, id: ProgressId) -> Result<Option<ProgressRecord>> {
        Ok(self.progress.get(&id).cloned())
    }

    async fn find_progress(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>> {
        Ok(self
            .progress
            .values()
            .find(|r| r.user_id == user_id && r.lab_id == lab_id)
            .cloned())
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> Result<Vec<ProgressRecord>> {
        Ok(self
            .progress
            .values()
            .filter(|r| progress_matches(r, filter))
            .cloned()
            .collect())
    }

    async fn delete_progress(&mut self, id: ProgressId) -> Result<()> {
        self.progress.remove(&id);
        Ok(())
    }

    async fn save_report(&mut self, report: &Report) -> Result<()> {
        self.reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn load_report(&self, id: ReportId) -> Result<Option<Report>> {
        Ok(self.reports.get(&id).cloned())
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        Ok(self
            .reports
            .values()
            .filter(|r| report_matches(r, filter))
            .cloned()
            .collect())
    }

    async fn delete_report(&mut self, id: ReportId) -> Result<()> {
        self.reports.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labhub_core::{ReportReason, ReportStatus, ReportTarget};

    #[tokio::test]
    async fn progress_round_trip_and_pair_lookup() {
        let mut storage = MemoryStorage::new();
        let user = UserId::new();
        let lab = LabId::new();

        let record = ProgressRecord::new(user, lab);
        storage.save_progress(&record).await.unwrap();

        let loaded = storage.load_progress(record.id).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, user);

        let found = storage.find_progress(user, lab).await.unwrap();
        assert!(found.is_some());
        assert!(storage
            .find_progress(user, LabId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn report_filter_respects_active_only() {
        let mut storage = MemoryStorage::new();
        let target = ReportTarget::Post(PostId::new());

        let open = Report::new(target, UserId::new(), ReportReason::Spam, None);
        let mut closed = Report::new(target, UserId::new(), ReportReason::Spam, None);
        closed.dismiss(UserId::new(), "duplicate");

        storage.save_report(&open).await.unwrap();
        storage.save_report(&closed).await.unwrap();

        let active = storage
            .list_reports(&ReportFilter {
                target: Some(target),
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, ReportStatus::Pending);
    }
}
