//! Content Moderation
//!
//! Report lifecycle management and the denormalized report counters on
//! reported posts and comments.

#![warn(missing_docs)]

pub mod service;
pub mod stats;
pub mod sync;

pub use service::{BasicReportService, ReportAction, ReportService};
pub use stats::{ReportPeriodStats, ReportStats};
pub use sync::TargetCounters;
