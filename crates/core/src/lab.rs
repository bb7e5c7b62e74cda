//! Lab entity with its engine-owned aggregate counters.

use serde::{Deserialize, Serialize};

use crate::id::{LabId, UserId};
use crate::Time;

/// A hands-on lab users can work through.
///
/// Most lab fields belong to the surrounding platform; the engine owns the
/// two aggregates. Neither counter is ever decremented: `view_count` goes up
/// once per access, `completion_count` once per distinct completion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lab {
    /// Unique identifier
    pub id: LabId,

    /// Lab title
    pub title: String,

    /// Author
    pub created_by: UserId,

    /// Only published labs can be started by members
    pub is_published: bool,

    /// Rough expected duration, if the author provided one
    pub estimated_minutes: Option<u32>,

    /// Accesses, one per view
    pub view_count: u64,

    /// Distinct user completions
    pub completion_count: u64,

    /// Creation timestamp
    pub created_at: Time,
}

impl Lab {
    /// Create an unpublished lab.
    pub fn new(title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: LabId::new(),
            title: title.into(),
            created_by,
            is_published: false,
            estimated_minutes: None,
            view_count: 0,
            completion_count: 0,
            created_at: chrono::Utc::now(),
        }
    }

    /// Count one access.
    pub fn increment_view_count(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    /// Count one distinct completion. The caller guarantees at most one call
    /// per user completion event.
    pub fn increment_completion_count(&mut self) {
        self.completion_count = self.completion_count.saturating_add(1);
    }

    /// Completions as a percentage of views; 0 when the lab has no views.
    pub fn completion_rate(&self) -> f64 {
        if self.view_count == 0 {
            return 0.0;
        }
        self.completion_count as f64 / self.view_count as f64 * 100.0
    }

    /// Whether `user` authored this lab.
    pub fn is_created_by(&self, user: UserId) -> bool {
        self.created_by == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rate_handles_zero_views() {
        let lab = Lab::new("SQL injection basics", UserId::new());
        assert_eq!(lab.completion_rate(), 0.0);
    }

    #[test]
    fn completion_rate_is_a_percentage() {
        let mut lab = Lab::new("XSS playground", UserId::new());
        for _ in 0..4 {
            lab.increment_view_count();
        }
        lab.increment_completion_count();
        assert_eq!(lab.completion_rate(), 25.0);
    }
}
