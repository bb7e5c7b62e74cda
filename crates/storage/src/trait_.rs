//! Storage trait abstraction.

use async_trait::async_trait;
use labhub_core::{
    Comment, CommentId, CoreError, Lab, LabId, Post, PostId, ProgressFilter, ProgressId,
    ProgressRecord, Report, ReportFilter, ReportId, UserId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// Storage abstraction for the engine's entities.
///
/// This trait allows different storage backends to be plugged in. `save_*`
/// is create-or-update keyed by the entity id; uniqueness of
/// `(user_id, lab_id)` progress pairs is looked up through `find_progress`
/// (and additionally enforced by the SQLite schema).
#[async_trait]
pub trait Storage: Send + Sync {
    // === Lab operations ===

    /// Save a lab (create or update).
    async fn save_lab(&mut self, lab: &Lab) -> Result<()>;

    /// Load a lab by ID.
    async fn load_lab(&self, id: LabId) -> Result<Option<Lab>>;

    /// List all labs.
    async fn list_labs(&self) -> Result<Vec<Lab>>;

    // === Post operations ===

    /// Save a post (create or update).
    async fn save_post(&mut self, post: &Post) -> Result<()>;

    /// Load a post by ID.
    async fn load_post(&self, id: PostId) -> Result<Option<Post>>;

    /// Delete a post.
    async fn delete_post(&mut self, id: PostId) -> Result<()>;

    // === Comment operations ===

    /// Save a comment (create or update).
    async fn save_comment(&mut self, comment: &Comment) -> Result<()>;

    /// Load a comment by ID.
    async fn load_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Delete a comment.
    async fn delete_comment(&mut self, id: CommentId) -> Result<()>;

    // === Progress operations ===

    /// Save a progress record (create or update).
    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()>;

    /// Load a progress record by ID.
    async fn load_progress(&self, id: ProgressId) -> Result<Option<ProgressRecord>>;

    /// Look up the unique record for a `(user, lab)` pair.
    async fn find_progress(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>>;

    /// List progress records matching the filter.
    async fn list_progress(&self, filter: &ProgressFilter) -> Result<Vec<ProgressRecord>>;

    /// Hard-delete a progress record.
    async fn delete_progress(&mut self, id: ProgressId) -> Result<()>;

    // === Report operations ===

    /// Save a report (create or update).
    async fn save_report(&mut self, report: &Report) -> Result<()>;

    /// Load a report by ID.
    async fn load_report(&self, id: ReportId) -> Result<Option<Report>>;

    /// List reports matching the filter.
    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    /// Hard-delete a report. Lifecycle transitions never call this; it backs
    /// the explicit administrative cleanup path only.
    async fn delete_report(&mut self, id: ReportId) -> Result<()>;
}

/// Whether `record` passes `filter`.
pub(crate) fn progress_matches(record: &ProgressRecord, filter: &ProgressFilter) -> bool {
    if let Some(user_id) = filter.user_id {
        if record.user_id != user_id {
            return false;
        }
    }
    if let Some(lab_id) = filter.lab_id {
        if record.lab_id != lab_id {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if record.status != status {
            return false;
        }
    }
    true
}

/// Whether `report` passes `filter`.
pub(crate) fn report_matches(report: &Report, filter: &ReportFilter) -> bool {
    if let Some(status) = filter.status {
        if report.status != status {
            return false;
        }
    }
    if let Some(target) = filter.target {
        if report.target != target {
            return false;
        }
    }
    if let Some(reported_by) = filter.reported_by {
        if report.reported_by != reported_by {
            return false;
        }
    }
    if filter.active_only && !report.is_active() {
        return false;
    }
    true
}
