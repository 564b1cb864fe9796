use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::resolve_actor;
use crate::models::prediction::PredictionRow;
use crate::predictions::scoring::score_prediction;
use crate::predictions::submission::submit_prediction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitPredictionRequest {
    pub actor_id: Uuid,
    pub movie_id: Uuid,
    pub predicted_gross: f64,
    pub reason: String,
}

/// POST /api/v1/predictions
pub async fn handle_submit_prediction(
    State(state): State<AppState>,
    Json(req): Json<SubmitPredictionRequest>,
) -> Result<Json<PredictionRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let prediction = submit_prediction(
        &state.db,
        &actor,
        req.movie_id,
        req.predicted_gross,
        req.reason,
        Utc::now(),
    )
    .await?;
    Ok(Json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct ScorePredictionRequest {
    pub actor_id: Uuid,
    pub actual_gross: f64,
}

/// POST /api/v1/predictions/:id/score
pub async fn handle_score_prediction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScorePredictionRequest>,
) -> Result<Json<PredictionRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let prediction = score_prediction(
        &state.db,
        &actor,
        id,
        req.actual_gross,
        state.config.clamp_accuracy,
    )
    .await?;
    Ok(Json(prediction))
}
