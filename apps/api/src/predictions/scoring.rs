//! Prediction scoring: a pure accuracy computation plus the write-once
//! application of an observed outcome.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Actor;
use crate::leaderboard::analysts::recompute_accuracy;
use crate::models::prediction::PredictionRow;

/// Accuracy above which a prediction counts as correct.
pub const CORRECT_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredOutcome {
    pub accuracy: f64,
    pub is_correct: bool,
    pub score: i32,
}

/// `accuracy = 1 − |actual − predicted| / actual`, clamped to [0, 1] unless
/// `clamp` is off (legacy parity mode, where extreme mispredictions produce
/// negative accuracy and a negative score). Deterministic in its inputs.
pub fn score_outcome(predicted_gross: f64, actual_gross: f64, clamp: bool) -> ScoredOutcome {
    let mut accuracy = 1.0 - (actual_gross - predicted_gross).abs() / actual_gross;
    if clamp {
        accuracy = accuracy.clamp(0.0, 1.0);
    }
    ScoredOutcome {
        accuracy,
        is_correct: accuracy > CORRECT_THRESHOLD,
        score: (accuracy * 100.0).round() as i32,
    }
}

/// Applies the observed gross to a prediction, exactly once.
///
/// The outcome fields are guarded against `actual_gross IS NULL`, so a
/// concurrent second scorer loses the race and observes `AlreadyScored`.
/// On success the submitter's rolling accuracy is recomputed.
pub async fn score_prediction(
    pool: &PgPool,
    actor: &Actor,
    prediction_id: Uuid,
    actual_gross: f64,
    clamp: bool,
) -> Result<PredictionRow, AppError> {
    actor.require_moderator()?;

    if !actual_gross.is_finite() || actual_gross <= 0.0 {
        return Err(AppError::InvalidOutcome(format!(
            "Actual gross must be a positive number, got {actual_gross}"
        )));
    }

    let existing: Option<PredictionRow> =
        sqlx::query_as("SELECT * FROM predictions WHERE id = $1")
            .bind(prediction_id)
            .fetch_optional(pool)
            .await?;
    let existing = existing
        .ok_or_else(|| AppError::NotFound(format!("Prediction {prediction_id} not found")))?;
    if existing.actual_gross.is_some() {
        return Err(AppError::AlreadyScored(format!(
            "Prediction {prediction_id} is already scored"
        )));
    }

    let outcome = score_outcome(existing.predicted_gross, actual_gross, clamp);

    let updated: Option<PredictionRow> = sqlx::query_as(
        r#"
        UPDATE predictions
        SET actual_gross = $2, is_correct = $3, score = $4
        WHERE id = $1 AND actual_gross IS NULL
        RETURNING *
        "#,
    )
    .bind(prediction_id)
    .bind(actual_gross)
    .bind(outcome.is_correct)
    .bind(outcome.score)
    .fetch_optional(pool)
    .await?;
    let updated = updated.ok_or_else(|| {
        AppError::AlreadyScored(format!("Prediction {prediction_id} is already scored"))
    })?;

    let accuracy = recompute_accuracy(pool, updated.user_id).await?;

    info!(
        "Prediction {} scored {} (correct: {}); user {} rolling accuracy {:.1}",
        updated.id, outcome.score, outcome.is_correct, updated.user_id, accuracy
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_miss_is_correct() {
        // predicted 100 against actual 110: accuracy 1 - 10/110 ≈ 0.909
        let o = score_outcome(100.0, 110.0, true);
        assert!(o.is_correct);
        assert_eq!(o.score, 91);
    }

    #[test]
    fn test_large_miss_scores_low() {
        // predicted 50 against actual 200: accuracy 1 - 150/200 = 0.25
        let o = score_outcome(50.0, 200.0, true);
        assert!(!o.is_correct);
        assert_eq!(o.score, 25);
    }

    #[test]
    fn test_exact_prediction_scores_hundred() {
        let o = score_outcome(150.0, 150.0, true);
        assert!(o.is_correct);
        assert_eq!(o.score, 100);
        assert_eq!(o.accuracy, 1.0);
    }

    #[test]
    fn test_wild_overprediction_clamps_to_zero() {
        // predicted 1000 against actual 100: raw accuracy 1 - 900/100 = -8
        let o = score_outcome(1000.0, 100.0, true);
        assert_eq!(o.accuracy, 0.0);
        assert_eq!(o.score, 0);
        assert!(!o.is_correct);
    }

    #[test]
    fn test_unclamped_mode_goes_negative() {
        let o = score_outcome(1000.0, 100.0, false);
        assert_eq!(o.accuracy, -8.0);
        assert_eq!(o.score, -800);
        assert!(!o.is_correct);
    }

    #[test]
    fn test_correct_threshold_is_strict() {
        // accuracy exactly 0.90 is not "correct"
        let o = score_outcome(90.0, 100.0, true);
        assert!((o.accuracy - 0.90).abs() < 1e-12);
        assert!(!o.is_correct);
        assert_eq!(o.score, 90);
    }

    #[test]
    fn test_deterministic() {
        let a = score_outcome(123.4, 456.7, true);
        let b = score_outcome(123.4, 456.7, true);
        assert_eq!(a, b);
    }
}
