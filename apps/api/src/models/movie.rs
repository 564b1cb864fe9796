use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Movie record maintained by the catalog side of the platform; read-only
/// input to the leaderboard aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MovieRow {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub gross: f64,
}
