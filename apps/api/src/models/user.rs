use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Platform roles, ordered roughly by trust. `Analyst` doubles as the
/// moderator role: approved analysts resolve flags and reports and run the
/// prediction-scoring job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Filmmaker,
    Reviewer,
    Analyst,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Filmmaker => "filmmaker",
            Role::Reviewer => "reviewer",
            Role::Analyst => "analyst",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "viewer" => Some(Role::Viewer),
            "filmmaker" => Some(Role::Filmmaker),
            "reviewer" => Some(Role::Reviewer),
            "analyst" => Some(Role::Analyst),
            _ => None,
        }
    }

    /// Capability set granted by this role. The core consumes capabilities,
    /// never roles, so the mapping lives in exactly one place.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_moderate: *self == Role::Analyst,
            can_predict: *self == Role::Analyst,
            can_appeal: true,
        }
    }
}

/// Capabilities of the acting user, resolved from their stored role record.
/// Upstream authentication is trusted; moderator-only operations check
/// `can_moderate` and fail `Forbidden` without it.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub can_moderate: bool,
    pub can_predict: bool,
    pub can_appeal: bool,
}

/// Current role of a user plus the bookkeeping that justifies it.
///
/// Review counts are not stored here: evaluation recomputes them from the
/// `review_activity` event log so the counter can never drift from the
/// source-of-truth events.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleRecordRow {
    pub user_id: Uuid,
    pub role: String,
    /// Role held before a demotion; consulted when an appeal is approved.
    pub prior_role: Option<String>,
    /// Set when the user fell below the activity threshold; demotion follows
    /// after the grace period unless activity recovers.
    pub warned_at: Option<DateTime<Utc>>,
    pub last_evaluated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
