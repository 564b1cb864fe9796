use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportTargetType {
    Review,
    Blog,
    Comment,
    GroupPost,
    NewsPost,
}

impl ReportTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportTargetType::Review => "review",
            ReportTargetType::Blog => "blog",
            ReportTargetType::Comment => "comment",
            ReportTargetType::GroupPost => "group_post",
            ReportTargetType::NewsPost => "news_post",
        }
    }

    pub fn parse(s: &str) -> Option<ReportTargetType> {
        match s {
            "review" => Some(ReportTargetType::Review),
            "blog" => Some(ReportTargetType::Blog),
            "comment" => Some(ReportTargetType::Comment),
            "group_post" => Some(ReportTargetType::GroupPost),
            "news_post" => Some(ReportTargetType::NewsPost),
            _ => None,
        }
    }
}

/// Same terminal-transition shape as flag status: `Pending` once, then
/// exactly one of the end states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(s: &str) -> Option<ReportStatus> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "resolved" => Some(ReportStatus::Resolved),
            "dismissed" => Some(ReportStatus::Dismissed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportStatus::Pending)
    }
}

/// A complaint against a specific piece of content. Kept forever for audit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    pub status: String,
    pub moderator_id: Option<Uuid>,
    pub moderator_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
