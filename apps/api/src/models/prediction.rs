use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A box-office forecast. `actual_gross`, `is_correct` and `score` are
/// write-once: null/default until the scoring job sets them, never touched
/// by the submitter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PredictionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub predicted_gross: f64,
    pub reason: String,
    pub actual_gross: Option<f64>,
    pub is_correct: Option<bool>,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}
