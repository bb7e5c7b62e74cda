//! Content reports and their moderation lifecycle.

use serde::{Deserialize, Serialize};

use crate::id::{CommentId, PostId, ReportId, UserId};
use crate::Time;

/// Maximum length of the reporter-supplied details text.
pub const MAX_DETAILS_LEN: usize = 500;

/// What a report is filed against. Exactly one target, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportTarget {
    /// A forum post
    Post(PostId),
    /// A comment on a post
    Comment(CommentId),
    /// A user account
    User(UserId),
}

impl ReportTarget {
    /// Short tag for logs and storage columns.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportTarget::Post(_) => "post",
            ReportTarget::Comment(_) => "comment",
            ReportTarget::User(_) => "user",
        }
    }

    /// The target's id rendered as a string, for storage keys.
    pub fn key(&self) -> String {
        match self {
            ReportTarget::Post(id) => id.to_string(),
            ReportTarget::Comment(id) => id.to_string(),
            ReportTarget::User(id) => id.to_string(),
        }
    }
}

impl std::fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.key())
    }
}

/// Why content was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportReason {
    /// Spam or irrelevant content
    Spam,
    /// Harassment or abuse
    Harassment,
    /// Inappropriate content
    InappropriateContent,
    /// Malicious code
    MaliciousCode,
    /// Copyright violation
    CopyrightViolation,
    /// Misinformation
    Misinformation,
    /// Hate speech
    HateSpeech,
    /// Illegal content
    IllegalContent,
    /// Anything else
    Other,
}

impl ReportReason {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Harassment => "harassment",
            ReportReason::InappropriateContent => "inappropriate_content",
            ReportReason::MaliciousCode => "malicious_code",
            ReportReason::CopyrightViolation => "copyright_violation",
            ReportReason::Misinformation => "misinformation",
            ReportReason::HateSpeech => "hate_speech",
            ReportReason::IllegalContent => "illegal_content",
            ReportReason::Other => "other",
        }
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spam" => Ok(ReportReason::Spam),
            "harassment" => Ok(ReportReason::Harassment),
            "inappropriate_content" => Ok(ReportReason::InappropriateContent),
            "malicious_code" => Ok(ReportReason::MaliciousCode),
            "copyright_violation" => Ok(ReportReason::CopyrightViolation),
            "misinformation" => Ok(ReportReason::Misinformation),
            "hate_speech" => Ok(ReportReason::HateSpeech),
            "illegal_content" => Ok(ReportReason::IllegalContent),
            "other" => Ok(ReportReason::Other),
            other => Err(format!("unknown report reason: {other}")),
        }
    }
}

/// Lifecycle state of a report.
///
/// `Pending → UnderReview → {Resolved, Dismissed, Escalated}`, where the
/// review step is optional and `Escalated` stays actionable. `Resolved` and
/// `Dismissed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Freshly filed, waiting for an admin
    Pending,
    /// An admin has picked it up
    UnderReview,
    /// Closed with action taken
    Resolved,
    /// Closed without action
    Dismissed,
    /// Flagged for senior attention; still active
    Escalated,
}

impl ReportStatus {
    /// Whether a report in this state still counts against its target.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReportStatus::Pending | ReportStatus::UnderReview | ReportStatus::Escalated
        )
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::UnderReview => "under_review",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
            ReportStatus::Escalated => "escalated",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "under_review" => Ok(ReportStatus::UnderReview),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            "escalated" => Ok(ReportStatus::Escalated),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

/// One user-submitted flag against exactly one target.
///
/// Reports are an audit trail: lifecycle transitions never delete them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier
    pub id: ReportId,

    /// What was flagged
    pub target: ReportTarget,

    /// Who filed the report
    pub reported_by: UserId,

    /// Why
    pub reason: ReportReason,

    /// Optional reporter-supplied context, at most [`MAX_DETAILS_LEN`] chars
    pub additional_details: Option<String>,

    /// Current lifecycle state
    pub status: ReportStatus,

    /// When the report was filed
    pub created_at: Time,

    /// First admin look at this report (set once, implicitly)
    pub reviewed_at: Option<Time>,

    /// The admin who first looked at it
    pub reviewed_by: Option<UserId>,

    /// Notes from review/escalation
    pub admin_notes: Option<String>,

    /// Closing text (resolution or dismissal reason)
    pub resolution: Option<String>,

    /// When the report was closed
    pub resolved_at: Option<Time>,

    /// The admin who closed it
    pub resolved_by: Option<UserId>,
}

impl Report {
    /// File a new report. Starts `Pending`.
    pub fn new(
        target: ReportTarget,
        reported_by: UserId,
        reason: ReportReason,
        additional_details: Option<String>,
    ) -> Self {
        Self {
            id: ReportId::new(),
            target,
            reported_by,
            reason,
            additional_details,
            status: ReportStatus::Pending,
            created_at: chrono::Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            admin_notes: None,
            resolution: None,
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Stamp the first review if it has not happened yet.
    pub fn mark_reviewed(&mut self, admin: UserId) {
        if self.reviewed_at.is_none() {
            self.reviewed_at = Some(chrono::Utc::now());
            self.reviewed_by = Some(admin);
        }
    }

    /// Move a pending report under review.
    pub fn begin_review(&mut self, admin: UserId) {
        self.status = ReportStatus::UnderReview;
        self.mark_reviewed(admin);
    }

    /// Close the report as resolved. An unreviewed report gets its first
    /// review stamped to the same admin.
    pub fn resolve(&mut self, admin: UserId, resolution: impl Into<String>) {
        self.status = ReportStatus::Resolved;
        self.resolved_by = Some(admin);
        self.resolved_at = Some(chrono::Utc::now());
        self.resolution = Some(resolution.into());
        self.mark_reviewed(admin);
    }

    /// Close the report as dismissed.
    pub fn dismiss(&mut self, admin: UserId, reason: impl Into<String>) {
        self.status = ReportStatus::Dismissed;
        self.resolved_by = Some(admin);
        self.resolved_at = Some(chrono::Utc::now());
        self.resolution = Some(reason.into());
        self.mark_reviewed(admin);
    }

    /// Escalate the report. It stays in the active set.
    pub fn escalate(&mut self, admin: UserId, notes: impl Into<String>) {
        self.status = ReportStatus::Escalated;
        self.admin_notes = Some(notes.into());
        self.mark_reviewed(admin);
    }

    /// Whether this report still counts against its target.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Filter for querying reports.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Restrict to one lifecycle state
    pub status: Option<ReportStatus>,

    /// Restrict to one target
    pub target: Option<ReportTarget>,

    /// Restrict to reports filed by one user
    pub reported_by: Option<UserId>,

    /// Keep only reports still in the active set
    pub active_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_report_is_pending_and_active() {
        let report = Report::new(
            ReportTarget::Post(PostId::new()),
            UserId::new(),
            ReportReason::Spam,
            None,
        );
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(report.is_active());
        assert!(report.reviewed_at.is_none());
    }

    #[test]
    fn resolve_stamps_implicit_first_review() {
        let mut report = Report::new(
            ReportTarget::Comment(CommentId::new()),
            UserId::new(),
            ReportReason::Harassment,
            None,
        );
        let admin = UserId::new();
        report.resolve(admin, "content removed");

        assert_eq!(report.status, ReportStatus::Resolved);
        assert!(!report.is_active());
        assert_eq!(report.resolved_by, Some(admin));
        assert!(report.resolved_at.is_some());
        assert_eq!(report.reviewed_by, Some(admin));
        assert!(report.reviewed_at.is_some());
    }

    #[test]
    fn first_review_is_never_overwritten() {
        let mut report = Report::new(
            ReportTarget::Post(PostId::new()),
            UserId::new(),
            ReportReason::Other,
            None,
        );
        let first_admin = UserId::new();
        let second_admin = UserId::new();

        report.begin_review(first_admin);
        let reviewed_at = report.reviewed_at;

        report.resolve(second_admin, "handled");
        assert_eq!(report.reviewed_by, Some(first_admin));
        assert_eq!(report.reviewed_at, reviewed_at);
        assert_eq!(report.resolved_by, Some(second_admin));
    }

    #[test]
    fn escalated_report_stays_active() {
        let mut report = Report::new(
            ReportTarget::User(UserId::new()),
            UserId::new(),
            ReportReason::HateSpeech,
            None,
        );
        report.escalate(UserId::new(), "needs senior review");
        assert_eq!(report.status, ReportStatus::Escalated);
        assert!(report.is_active());
        assert!(report.resolved_at.is_none());
    }

    #[test]
    fn dismissed_report_leaves_active_set() {
        let mut report = Report::new(
            ReportTarget::Post(PostId::new()),
            UserId::new(),
            ReportReason::Misinformation,
            Some("looks wrong".to_string()),
        );
        report.dismiss(UserId::new(), "not a violation");
        assert_eq!(report.status, ReportStatus::Dismissed);
        assert!(!report.is_active());
        assert!(report.status.is_terminal());
    }
}
