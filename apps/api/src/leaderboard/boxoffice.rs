//! Box-office leaderboard and chart projections over the movie catalog.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::leaderboard::window::{window_start, Period};
use crate::models::movie::MovieRow;

pub const LEADERBOARD_SIZE: i64 = 10;
pub const CHART_SIZE: i64 = 5;

/// Movies released within the trailing window ending at `now`, ranked by
/// gross descending, top 10.
pub async fn leaderboard(
    pool: &PgPool,
    period: Period,
    now: NaiveDate,
) -> Result<Vec<MovieRow>, AppError> {
    let start = window_start(period, now);
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM movies
        WHERE release_date > $1 AND release_date <= $2
        ORDER BY gross DESC
        LIMIT $3
        "#,
    )
    .bind(start)
    .bind(now)
    .bind(LEADERBOARD_SIZE)
    .fetch_all(pool)
    .await?)
}

/// Parallel label/value sequences for the top-grossing chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

pub fn to_series(movies: &[MovieRow]) -> ChartSeries {
    ChartSeries {
        labels: movies.iter().map(|m| m.title.clone()).collect(),
        values: movies.iter().map(|m| m.gross).collect(),
    }
}

/// Top-5 movies by gross across the whole catalog; no date filter.
pub async fn chart_series(pool: &PgPool) -> Result<ChartSeries, AppError> {
    let movies: Vec<MovieRow> =
        sqlx::query_as("SELECT * FROM movies ORDER BY gross DESC LIMIT $1")
            .bind(CHART_SIZE)
            .fetch_all(pool)
            .await?;
    Ok(to_series(&movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn movie(title: &str, gross: f64) -> MovieRow {
        MovieRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            gross,
        }
    }

    #[test]
    fn test_series_keeps_label_value_pairs_parallel() {
        let movies = vec![movie("Dune", 700.0), movie("Barbie", 1400.0)];
        let series = to_series(&movies);
        assert_eq!(series.labels, vec!["Dune", "Barbie"]);
        assert_eq!(series.values, vec![700.0, 1400.0]);
    }

    #[test]
    fn test_series_of_empty_catalog() {
        let series = to_series(&[]);
        assert!(series.labels.is_empty());
        assert!(series.values.is_empty());
    }
}
