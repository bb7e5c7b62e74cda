//! Lab aggregate counters.
//!
//! Views and completions only ever go up. The completion counter has no
//! idempotence of its own: the tracker checks the record's prior status and
//! calls `record_completion` exactly once per genuine completion event.

use std::sync::Arc;

use labhub_core::{CoreError, Lab, LabId, Result};
use labhub_storage::Storage;
use tokio::sync::Mutex;
use tracing::debug;

/// Counter updates for lab aggregates.
pub struct LabCounters<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> Clone for LabCounters<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Storage> LabCounters<S> {
    /// Create counters over a shared storage handle.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Count one access of `lab_id`.
    pub async fn record_view(&self, lab_id: LabId) -> Result<Lab> {
        let mut storage = self.storage.lock().await;
        let mut lab = storage
            .load_lab(lab_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("lab {lab_id}")))?;

        lab.increment_view_count();
        storage.save_lab(&lab).await?;
        debug!(lab = %lab_id, views = lab.view_count, "recorded lab view");
        Ok(lab)
    }

    /// Count one distinct completion of `lab_id`.
    pub async fn record_completion(&self, lab_id: LabId) -> Result<Lab> {
        let mut storage = self.storage.lock().await;
        let mut lab = storage
            .load_lab(lab_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("lab {lab_id}")))?;

        lab.increment_completion_count();
        storage.save_lab(&lab).await?;
        debug!(
            lab = %lab_id,
            completions = lab.completion_count,
            "recorded lab completion"
        );
        Ok(lab)
    }
}
