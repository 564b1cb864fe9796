use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::leaderboard::analysts::{recompute_accuracy, top_analysts};
use crate::leaderboard::boxoffice::{chart_series, leaderboard, ChartSeries};
use crate::leaderboard::window::Period;
use crate::models::analyst::AnalystRow;
use crate::models::movie::MovieRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TopAnalystsQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/analysts/top
pub async fn handle_top_analysts(
    State(state): State<AppState>,
    Query(params): Query<TopAnalystsQuery>,
) -> Result<Json<Vec<AnalystRow>>, AppError> {
    let limit = params.limit.unwrap_or(10);
    let analysts = top_analysts(&state.db, limit).await?;
    Ok(Json(analysts))
}

#[derive(Debug, Serialize)]
pub struct AnalystAccuracyResponse {
    pub user_id: Uuid,
    pub accuracy: f64,
}

/// GET /api/v1/analysts/:user_id/accuracy
///
/// Recomputes the rolling accuracy from scored predictions before answering,
/// so the reply never lags the projection.
pub async fn handle_analyst_accuracy(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AnalystAccuracyResponse>, AppError> {
    let accuracy = recompute_accuracy(&state.db, user_id).await?;
    Ok(Json(AnalystAccuracyResponse { user_id, accuracy }))
}

/// GET /api/v1/leaderboard/:period
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Result<Json<Vec<MovieRow>>, AppError> {
    let period = Period::parse(&period)
        .ok_or_else(|| AppError::Validation(format!("Unknown leaderboard period '{period}'")))?;
    let movies = leaderboard(&state.db, period, Utc::now().date_naive()).await?;
    Ok(Json(movies))
}

/// GET /api/v1/charts/top-grossing
pub async fn handle_chart_series(
    State(state): State<AppState>,
) -> Result<Json<ChartSeries>, AppError> {
    let series = chart_series(&state.db).await?;
    Ok(Json(series))
}
