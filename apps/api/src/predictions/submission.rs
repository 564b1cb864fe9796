//! Prediction submission: input validation and the one-open-prediction-per-
//! movie guard.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Actor;
use crate::models::prediction::PredictionRow;

pub fn validate_submission(predicted_gross: f64, reason: &str) -> Result<(), AppError> {
    if !predicted_gross.is_finite() || predicted_gross <= 0.0 {
        return Err(AppError::Validation(format!(
            "Predicted gross must be a positive number, got {predicted_gross}"
        )));
    }
    if reason.trim().is_empty() {
        return Err(AppError::Validation(
            "Prediction reason must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Creates a prediction with null outcome fields.
///
/// A user may hold at most one unscored prediction per movie; once scored,
/// the pair is free again for a fresh forecast.
pub async fn submit_prediction(
    pool: &PgPool,
    actor: &Actor,
    movie_id: Uuid,
    predicted_gross: f64,
    reason: String,
    now: DateTime<Utc>,
) -> Result<PredictionRow, AppError> {
    if !actor.capabilities.can_predict {
        return Err(AppError::Forbidden);
    }
    validate_submission(predicted_gross, &reason)?;

    let has_open: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM predictions
            WHERE user_id = $1 AND movie_id = $2 AND actual_gross IS NULL
        )
        "#,
    )
    .bind(actor.id)
    .bind(movie_id)
    .fetch_one(pool)
    .await?;
    if has_open {
        return Err(AppError::DuplicatePrediction(format!(
            "User {} already has an unscored prediction for movie {movie_id}",
            actor.id
        )));
    }

    let prediction: PredictionRow = sqlx::query_as(
        r#"
        INSERT INTO predictions
            (id, user_id, movie_id, predicted_gross, reason, score, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor.id)
    .bind(movie_id)
    .bind(predicted_gross)
    .bind(&reason)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!(
        "Prediction {} submitted by {} for movie {movie_id}",
        prediction.id, actor.id
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission_passes() {
        assert!(validate_submission(250_000_000.0, "Franchise opener with strong presales").is_ok());
    }

    #[test]
    fn test_zero_gross_rejected() {
        assert!(matches!(
            validate_submission(0.0, "reason"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_gross_rejected() {
        assert!(validate_submission(-5.0, "reason").is_err());
    }

    #[test]
    fn test_non_finite_gross_rejected() {
        assert!(validate_submission(f64::NAN, "reason").is_err());
        assert!(validate_submission(f64::INFINITY, "reason").is_err());
    }

    #[test]
    fn test_blank_reason_rejected() {
        assert!(matches!(
            validate_submission(100.0, "   "),
            Err(AppError::Validation(_))
        ));
    }
}
