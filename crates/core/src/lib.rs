//! LabHub core data models.
//!
//! This crate defines the entities behind the progress-tracking and
//! content-moderation engine: per-user lab progress records, content
//! reports, and the denormalized counters on labs, posts, and comments.

#![warn(missing_docs)]

// Core identities
mod id;

// Authorization context
mod actor;

// Progress tracking
mod progress;
mod lab;

// Moderation
mod report;
mod content;

// Errors
mod error;

// Re-exports
pub use id::*;

pub use actor::{Actor, Role};

// Progress & labs
pub use lab::Lab;
pub use progress::{ProgressFilter, ProgressRecord, ProgressStatus};

// Reports & content
pub use content::{Comment, Post};
pub use report::{
    Report, ReportFilter, ReportReason, ReportStatus, ReportTarget, MAX_DETAILS_LEN,
};

pub use error::{CoreError, Result};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
