use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::resolve_actor;
use crate::roles::evaluation::{evaluate, EvaluationOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub actor_id: Uuid,
}

/// POST /api/v1/roles/:user_id/evaluate
///
/// Runs one evaluation pass for the user. Invoked by the periodic evaluation
/// job and by moderators; both carry moderator capability.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluationOutcome>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    actor.require_moderator()?;

    let outcome = evaluate(&state.db, user_id, Utc::now()).await?;
    Ok(Json(outcome))
}
