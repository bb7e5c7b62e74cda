//! SQLite storage backend.
//!
//! One table per entity family. Entities are serialized as JSON in a `data`
//! column; the columns next to it are the keys the engine's constraints and
//! lookups need, kept in sync on every save. The `(user_id, lab_id)`
//! uniqueness of progress records lives in the schema, so even a second
//! process cannot double-create a pair.

use async_trait::async_trait;
use labhub_core::{
    Comment, CommentId, Lab, LabId, Post, PostId, ProgressFilter, ProgressId, ProgressRecord,
    Report, ReportFilter, ReportId, UserId,
};
use sqlx::Row;

use super::trait_::{progress_matches, report_matches, Result, Storage, StorageError};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance.
    pub async fn new(db_path: &str) -> Result<Self> {
        let pool = sqlx::SqlitePool::connect(db_path)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Create an in-memory SQLite storage for testing.
    pub async fn in_memory() -> Result<Self> {
        Self::new(":memory:").await
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS labs (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS progress (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                lab_id TEXT NOT NULL,
                status TEXT NOT NULL,
                data TEXT NOT NULL,
                UNIQUE(user_id, lab_id)
            )",
            "CREATE TABLE IF NOT EXISTS reports (
                id TEXT PRIMARY KEY,
                target_kind TEXT NOT NULL,
                target_id TEXT NOT NULL,
                reported_by TEXT NOT NULL,
                status TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_progress_user ON progress(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_progress_lab ON progress(lab_id)",
            "CREATE INDEX IF NOT EXISTS idx_reports_target ON reports(target_kind, target_id)",
            "CREATE INDEX IF NOT EXISTS idx_reports_reporter ON reports(reported_by)",
            "CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::Other(e.to_string()))?;
        }

        Ok(())
    }

    /// Helper to extract string from row.
    fn get_string(row: &sqlx::sqlite::SqliteRow, column: &str) -> String {
        row.try_get(column).unwrap_or_default()
    }

    async fn load_json<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>> {
        let row = sqlx::query(&format!("SELECT data FROM {table} WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await;

        match row {
            Ok(row) => {
                let data = Self::get_string(&row, "data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(StorageError::Other(e.to_string())),
        }
    }

    async fn list_json<T: serde::de::DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let rows = sqlx::query(&format!("SELECT data FROM {table}"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let data = Self::get_string(&row, "data");
                serde_json::from_str(&data).map_err(StorageError::Json)
            })
            .collect()
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // === Lab operations ===

    async fn save_lab(&mut self, lab: &Lab) -> Result<()> {
        let data = serde_json::to_string(lab)?;

        sqlx::query("INSERT OR REPLACE INTO labs (id, data) VALUES (?, ?)")
            .bind(lab.id.to_string())
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_lab(&self, id: LabId) -> Result<Option<Lab>> {
        self.load_json("labs", &id.to_string()).await
    }

    async fn list_labs(&self) -> Result<Vec<Lab>> {
        self.list_json("labs").await
    }

    // === Post operations ===

    async fn save_post(&mut self, post: &Post) -> Result<()> {
        let data = serde_json::to_string(post)?;

        sqlx::query("INSERT OR REPLACE INTO posts (id, author_id, data) VALUES (?, ?, ?)")
            .bind(post.id.to_string())
            .bind(post.author_id.to_string())
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_post(&self, id: PostId) -> Result<Option<Post>> {
        self.load_json("posts", &id.to_string()).await
    }

    async fn delete_post(&mut self, id: PostId) -> Result<()> {
        self.delete_row("posts", &id.to_string()).await
    }

    // === Comment operations ===

    async fn save_comment(&mut self, comment: &Comment) -> Result<()> {
        let data = serde_json::to_string(comment)?;

        sqlx::query("INSERT OR REPLACE INTO comments (id, author_id, data) VALUES (?, ?, ?)")
            .bind(comment.id.to_string())
            .bind(comment.author_id.to_string())
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.load_json("comments", &id.to_string()).await
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<()> {
        self.delete_row("comments", &id.to_string()).await
    }

    // === Progress operations ===

    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()> {
        let data = serde_json::to_string(record)?;

        sqlx::query(
            "INSERT OR REPLACE INTO progress (id, user_id, lab_id, status, data)
            VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.lab_id.to_string())
        .bind(record.status.as_str())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_progress(&self, id: ProgressId) -> Result<Option<ProgressRecord>> {
        self.load_json("progress", &id.to_string()).await
    }

    async fn find_progress(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query("SELECT data FROM progress WHERE user_id = ? AND lab_id = ?")
            .bind(user_id.to_string())
            .bind(lab_id.to_string())
            .fetch_one(&self.pool)
            .await;

        match row {
            Ok(row) => {
                let data = Self::get_string(&row, "data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(StorageError::Other(e.to_string())),
        }
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> Result<Vec<ProgressRecord>> {
        let mut records: Vec<ProgressRecord> = self.list_json("progress").await?;
        records.retain(|r| progress_matches(r, filter));
        Ok(records)
    }

    async fn delete_progress(&mut self, id: ProgressId) -> Result<()> {
        self.delete_row("progress", &id.to_string()).await
    }

    // === Report operations ===

    async fn save_report(&mut self, report: &Report) -> Result<()> {
        let data = serde_json::to_string(report)?;

        sqlx::query(
            "INSERT OR REPLACE INTO reports (id, target_kind, target_id, reported_by, status, data)
            VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(report.id.to_string())
        .bind(report.target.kind())
        .bind(report.target.key())
        .bind(report.reported_by.to_string())
        .bind(report.status.as_str())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_report(&self, id: ReportId) -> Result<Option<Report>> {
        self.load_json("reports", &id.to_string()).await
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self.list_json("reports").await?;
        reports.retain(|r| report_matches(r, filter));
        Ok(reports)
    }

    async fn delete_report(&mut self, id: ReportId) -> Result<()> {
        self.delete_row("reports", &id.to_string()).await
    }
}
