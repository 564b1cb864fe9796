use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Appeal against a role decision (demotion or pending demotion).
    ReviewerRoleAppeal,
    /// Complaint against a piece of content routed through flag review.
    ContentComplaint,
}

impl FlagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::ReviewerRoleAppeal => "reviewer_role_appeal",
            FlagKind::ContentComplaint => "content_complaint",
        }
    }

    pub fn parse(s: &str) -> Option<FlagKind> {
        match s {
            "reviewer_role_appeal" => Some(FlagKind::ReviewerRoleAppeal),
            "content_complaint" => Some(FlagKind::ContentComplaint),
            _ => None,
        }
    }
}

/// `Pending` on creation; both resolved states are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagStatus {
    Pending,
    Approved,
    Rejected,
}

impl FlagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagStatus::Pending => "pending",
            FlagStatus::Approved => "approved",
            FlagStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<FlagStatus> {
        match s {
            "pending" => Some(FlagStatus::Pending),
            "approved" => Some(FlagStatus::Approved),
            "rejected" => Some(FlagStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlagStatus::Pending)
    }
}

/// A user-submitted appeal or complaint. Never deleted; resolution is the
/// only mutation, and it happens at most once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlagRow {
    pub id: Uuid,
    pub submitter_id: Uuid,
    pub kind: String,
    /// Content id or user id, depending on kind.
    pub target_ref: String,
    pub reason: String,
    pub description: String,
    pub evidence_ref: Option<String>,
    /// Re-appeals are new flags chained to the resolved original.
    pub references_flag_id: Option<Uuid>,
    pub status: String,
    /// Moderator who resolved the flag; null until resolved.
    pub reviewer_id: Option<Uuid>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
