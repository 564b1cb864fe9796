//! Analyst accuracy projection and the top-analysts ranking.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analyst::AnalystRow;

/// Arithmetic mean of prediction scores. No scored predictions → 0, not an
/// error.
pub fn mean_score(scores: &[i32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}

/// Ranks analysts by accuracy descending; ties go to the earlier
/// registration. Deterministic, so repeated spotlight listings agree.
pub fn rank_top(mut analysts: Vec<AnalystRow>, limit: usize) -> Vec<AnalystRow> {
    analysts.sort_by(|a, b| {
        b.accuracy
            .total_cmp(&a.accuracy)
            .then_with(|| a.registered_at.cmp(&b.registered_at))
    });
    analysts.truncate(limit);
    analysts
}

/// Recomputes a user's rolling accuracy from their scored predictions and
/// persists it onto the analyst profile. Called after every scoring pass.
pub async fn recompute_accuracy(pool: &PgPool, user_id: Uuid) -> Result<f64, AppError> {
    let scores: Vec<i32> = sqlx::query_scalar(
        "SELECT score FROM predictions WHERE user_id = $1 AND actual_gross IS NOT NULL",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let accuracy = mean_score(&scores);

    sqlx::query("UPDATE analysts SET accuracy = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(accuracy)
        .execute(pool)
        .await?;

    debug!(
        "Recomputed accuracy for {user_id}: {accuracy:.1} over {} scored predictions",
        scores.len()
    );
    Ok(accuracy)
}

/// Top approved analysts for the spotlight listing.
pub async fn top_analysts(pool: &PgPool, limit: usize) -> Result<Vec<AnalystRow>, AppError> {
    let approved: Vec<AnalystRow> =
        sqlx::query_as("SELECT * FROM analysts WHERE approval_status = 'approved'")
            .fetch_all(pool)
            .await?;
    Ok(rank_top(approved, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn analyst(accuracy: f64, registered_day: u32) -> AnalystRow {
        AnalystRow {
            user_id: Uuid::new_v4(),
            approval_status: "approved".to_string(),
            accuracy,
            registered_at: Utc.with_ymd_and_hms(2024, 1, registered_day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_mean_of_scores() {
        assert_eq!(mean_score(&[80, 100, 60]), 80.0);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean_score(&[]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_accuracy_descending() {
        let ranked = rank_top(vec![analyst(70.0, 1), analyst(95.0, 2)], 10);
        assert_eq!(ranked[0].accuracy, 95.0);
        assert_eq!(ranked[1].accuracy, 70.0);
    }

    #[test]
    fn test_tie_goes_to_earlier_registration() {
        let a70 = analyst(70.0, 1);
        let tied_later = analyst(95.0, 3);
        let tied_earlier = analyst(95.0, 2);
        let expected = [tied_earlier.user_id, tied_later.user_id];

        let ranked = rank_top(vec![a70, tied_later, tied_earlier], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!([ranked[0].user_id, ranked[1].user_id], expected);
    }

    #[test]
    fn test_limit_truncates() {
        let ranked = rank_top(
            vec![analyst(50.0, 1), analyst(60.0, 2), analyst(70.0, 3)],
            2,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].accuracy, 70.0);
    }

    #[test]
    fn test_rank_is_deterministic_across_runs() {
        let rows = vec![analyst(95.0, 2), analyst(95.0, 1), analyst(80.0, 3)];
        let first: Vec<Uuid> = rank_top(rows.clone(), 3).iter().map(|a| a.user_id).collect();
        let second: Vec<Uuid> = rank_top(rows, 3).iter().map(|a| a.user_id).collect();
        assert_eq!(first, second);
    }
}
