//! JSON file storage implementation.
//!
//! Stores each entity as one JSON file under a root directory (one
//! subdirectory per entity kind). Good enough for the CLI and small
//! deployments; anything with real concurrency should use the SQLite
//! backend.

use std::path::Path;

use labhub_core::{
    Comment, CommentId, Lab, LabId, Post, PostId, ProgressFilter, ProgressId, ProgressRecord,
    Report, ReportFilter, ReportId, UserId,
};
use tokio::fs;

use super::trait_::{progress_matches, report_matches, Result, Storage};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: std::path::PathBuf,
}

impl JsonStorage {
    /// Open storage rooted at `root`, creating the per-entity
    /// subdirectories as needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("labs")).await?;
        fs::create_dir_all(root.join("posts")).await?;
        fs::create_dir_all(root.join("comments")).await?;
        fs::create_dir_all(root.join("progress")).await?;
        fs::create_dir_all(root.join("reports")).await?;

        Ok(Self { root })
    }

    fn lab_path(&self, id: LabId) -> std::path::PathBuf {
        self.root.join("labs").join(format!("{}.json", id))
    }
    fn post_path(&self, id: PostId) -> std::path::PathBuf {
        self.root.join("posts").join(format!("{}.json", id))
    }
    fn comment_path(&self, id: CommentId) -> std::path::PathBuf {
        self.root.join("comments").join(format!("{}.json", id))
    }
    fn progress_path(&self, id: ProgressId) -> std::path::PathBuf {
        self.root.join("progress").join(format!("{}.json", id))
    }
    fn report_path(&self, id: ReportId) -> std::path::PathBuf {
        self.root.join("reports").join(format!("{}.json", id))
    }

    async fn write_json<T: serde::Serialize>(
        path: &std::path::Path,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json.as_bytes()).await?;
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        path: &std::path::Path,
    ) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_dir_json<T: serde::de::DeserializeOwned>(
        &self,
        dir: &str,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut entries = fs::read_dir(self.root.join(dir)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let s = fs::read_to_string(&path).await?;
            out.push(serde_json::from_str(&s)?);
        }
        Ok(out)
    }

    async fn remove_file(path: &std::path::Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            // Deletes are idempotent across backends
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "delete of missing entity ignored");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_lab(&mut self, lab: &Lab) -> Result<()> {
        Self::write_json(&self.lab_path(lab.id), lab).await
    }

    async fn load_lab(&self, id: LabId) -> Result<Option<Lab>> {
        Self::read_json(&self.lab_path(id)).await
    }

    async fn list_labs(&self) -> Result<Vec<Lab>> {
        self.read_dir_json("labs").await
    }

    async fn save_post(&mut self, post: &Post) -> Result<()> {
        Self::write_json(&self.post_path(post.id), post).await
    }

    async fn load_post(&self, id: PostId) -> Result<Option<Post>> {
        Self::read_json(&self.post_path(id)).await
    }

    async fn delete_post(&mut self, id: PostId) -> Result<()> {
        Self::remove_file(&self.post_path(id)).await
    }

    async fn save_comment(&mut self, comment: &Comment) -> Result<()> {
        Self::write_json(&self.comment_path(comment.id), comment).await
    }

    async fn load_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        Self::read_json(&self.comment_path(id)).await
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<()> {
        Self::remove_file(&self.comment_path(id)).await
    }

    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()> {
        Self::write_json(&self.progress_path(record.id), record).await
    }

    async fn load_progress(&self, id: ProgressId) -> Result<Option<ProgressRecord>> {
        Self::read_json(&self.progress_path(id)).await
    }

    async fn find_progress(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>> {
        let all: Vec<ProgressRecord> = self.read_dir_json("progress").await?;
        Ok(all
            .into_iter()
            .find(|r| r.user_id == user_id && r.lab_id == lab_id))
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> Result<Vec<ProgressRecord>> {
        let all: Vec<ProgressRecord> = self.read_dir_json("progress").await?;
        Ok(all
            .into_iter()
            .filter(|r| progress_matches(r, filter))
            .collect())
    }

    async fn delete_progress(&mut self, id: ProgressId) -> Result<()> {
        Self::remove_file(&self.progress_path(id)).await
    }

    async fn save_report(&mut self, report: &Report) -> Result<()> {
        Self::write_json(&self.report_path(report.id), report).await
    }

    async fn load_report(&self, id: ReportId) -> Result<Option<Report>> {
        Self::read_json(&self.report_path(id)).await
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let all: Vec<Report> = self.read_dir_json("reports").await?;
        Ok(all
            .into_iter()
            .filter(|r| report_matches(r, filter))
            .collect())
    }

    async fn delete_report(&mut self, id: ReportId) -> Result<()> {
        Self::remove_file(&self.report_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let lab = Lab::new("Buffer overflows 101", UserId::new());
        storage.save_lab(&lab).await.unwrap();

        let loaded = storage.load_lab(lab.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, lab.title);

        let record = ProgressRecord::new(UserId::new(), lab.id);
        storage.save_progress(&record).await.unwrap();
        let found = storage
            .find_progress(record.user_id, lab.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, record.id);
    }

    #[tokio::test]
    async fn missing_entities_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_lab(LabId::new()).await.unwrap().is_none());
        assert!(storage
            .load_report(ReportId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_progress_is_a_hard_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let record = ProgressRecord::new(UserId::new(), LabId::new());
        storage.save_progress(&record).await.unwrap();
        storage.delete_progress(record.id).await.unwrap();

        assert!(storage
            .load_progress(record.id)
            .await
            .unwrap()
            .is_none());
    }
}
