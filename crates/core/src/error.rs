//! Error taxonomy shared by the progress and moderation services.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors returned by the engine's operations.
///
/// Every variant carries a message with enough detail for the caller to
/// render a user-facing explanation. Counters and denormalized fields are
/// only mutated after the owning state transition has passed these checks.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed validation (bad percentage, over-long text, operation
    /// attempted before its precondition)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced lab, record, report, or target does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to perform this mutation
    #[error("permission denied: {0}")]
    Permission(String),

    /// Operation conflicts with existing state (duplicate active report,
    /// self-report)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying storage failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// True for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::Storage(_))
    }
}
