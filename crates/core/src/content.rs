//! Post and comment entities, reduced to what the engine owns: authorship
//! (for the self-report check) and the denormalized moderation summary.

use serde::{Deserialize, Serialize};

use crate::id::{CommentId, PostId, UserId};
use crate::Time;

/// A forum post.
///
/// `report_count`/`is_reported` are a materialized view over the active
/// reports against this post; `set_active_report_count` is the only way to
/// lower them, and it keeps `is_reported == (report_count > 0)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: PostId,

    /// Author
    pub author_id: UserId,

    /// Post title
    pub title: String,

    /// Accesses, one per view
    pub view_count: u64,

    /// Active reports currently counted against this post
    pub report_count: u32,

    /// Whether any active report exists
    pub is_reported: bool,

    /// Creation timestamp
    pub created_at: Time,
}

impl Post {
    /// Create a post.
    pub fn new(author_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: PostId::new(),
            author_id,
            title: title.into(),
            view_count: 0,
            report_count: 0,
            is_reported: false,
            created_at: chrono::Utc::now(),
        }
    }

    /// Count one access.
    pub fn increment_view_count(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    /// Count one new report against this post.
    pub fn flag_reported(&mut self) {
        self.report_count = self.report_count.saturating_add(1);
        self.is_reported = true;
    }

    /// Overwrite the summary with a recomputed active-report count.
    pub fn set_active_report_count(&mut self, count: u32) {
        self.report_count = count;
        self.is_reported = count > 0;
    }

    /// Whether `user` wrote this post.
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author_id == user
    }
}

/// A comment on a post. Carries the same moderation summary as a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,

    /// The post this comment is on
    pub post_id: PostId,

    /// Author
    pub author_id: UserId,

    /// Active reports currently counted against this comment
    pub report_count: u32,

    /// Whether any active report exists
    pub is_reported: bool,

    /// Creation timestamp
    pub created_at: Time,
}

impl Comment {
    /// Create a comment.
    pub fn new(post_id: PostId, author_id: UserId) -> Self {
        Self {
            id: CommentId::new(),
            post_id,
            author_id,
            report_count: 0,
            is_reported: false,
            created_at: chrono::Utc::now(),
        }
    }

    /// Count one new report against this comment.
    pub fn flag_reported(&mut self) {
        self.report_count = self.report_count.saturating_add(1);
        self.is_reported = true;
    }

    /// Overwrite the summary with a recomputed active-report count.
    pub fn set_active_report_count(&mut self, count: u32) {
        self.report_count = count;
        self.is_reported = count > 0;
    }

    /// Whether `user` wrote this comment.
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author_id == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_summary_invariant_holds() {
        let mut post = Post::new(UserId::new(), "Writeup: heap exploitation");
        assert!(!post.is_reported);

        post.flag_reported();
        post.flag_reported();
        assert_eq!(post.report_count, 2);
        assert!(post.is_reported);

        post.set_active_report_count(1);
        assert!(post.is_reported);

        post.set_active_report_count(0);
        assert_eq!(post.report_count, 0);
        assert!(!post.is_reported);
    }
}
