use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// Analyst registration plus the rolling prediction accuracy (0–100).
/// `accuracy` is derived from scored predictions and recomputed after every
/// scoring call; it is never set directly by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalystRow {
    pub user_id: Uuid,
    pub approval_status: String,
    pub accuracy: f64,
    pub registered_at: DateTime<Utc>,
}
