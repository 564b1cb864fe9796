//! Report lifecycle: the Pending → Resolved/Dismissed transition over content
//! reports, plus the upheld-report take-down side effect.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Actor;
use crate::models::report::{ReportRow, ReportStatus, ReportTargetType};
use crate::moderation::reasons::is_recognized_report_reason;
use crate::notify::{TakedownNotice, TakedownNotifier};

#[derive(Debug, Clone)]
pub struct ReportSubmission {
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: String,
}

pub fn validate_submission(submission: &ReportSubmission) -> Result<(), AppError> {
    if submission.target_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Report target is required".to_string(),
        ));
    }
    if !is_recognized_report_reason(&submission.reason) {
        return Err(AppError::Validation(format!(
            "Reason '{}' is not a recognized report reason",
            submission.reason
        )));
    }
    Ok(())
}

/// Creates a report in `Pending`.
pub async fn submit_report(
    pool: &PgPool,
    actor: &Actor,
    submission: ReportSubmission,
    now: DateTime<Utc>,
) -> Result<ReportRow, AppError> {
    validate_submission(&submission)?;

    let report: ReportRow = sqlx::query_as(
        r#"
        INSERT INTO reports
            (id, reporter_id, target_type, target_id, reason, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor.id)
    .bind(submission.target_type.as_str())
    .bind(&submission.target_id)
    .bind(&submission.reason)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!(
        "Report {} submitted by {} against {} {}",
        report.id,
        actor.id,
        submission.target_type.as_str(),
        submission.target_id
    );
    Ok(report)
}

/// Resolves a pending report to `Resolved` (upheld) or `Dismissed`.
///
/// Same optimistic guard as flag resolution: concurrent resolvers cannot both
/// succeed. Upholding a report checks the target's upheld-report count and
/// dispatches a take-down notice once it reaches the configured threshold;
/// delivery runs detached and never affects the response.
pub async fn resolve_report(
    pool: &PgPool,
    actor: &Actor,
    report_id: Uuid,
    outcome: ReportStatus,
    note: Option<String>,
    now: DateTime<Utc>,
    takedown_threshold: i64,
    notifier: Arc<dyn TakedownNotifier>,
) -> Result<ReportRow, AppError> {
    actor.require_moderator()?;
    debug_assert!(outcome.is_terminal());

    let resolved: Option<ReportRow> = sqlx::query_as(
        r#"
        UPDATE reports
        SET status = $2, moderator_id = $3, moderator_note = $4, resolved_at = $5
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(outcome.as_str())
    .bind(actor.id)
    .bind(note.as_deref())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    let report = match resolved {
        Some(report) => report,
        None => {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM reports WHERE id = $1")
                    .bind(report_id)
                    .fetch_optional(pool)
                    .await?;
            return Err(match current {
                None => AppError::NotFound(format!("Report {report_id} not found")),
                Some(status) => AppError::InvalidTransition(format!(
                    "Report {report_id} is already {status}"
                )),
            });
        }
    };

    if outcome == ReportStatus::Resolved {
        let upheld_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reports
            WHERE target_type = $1 AND target_id = $2 AND status = 'resolved'
            "#,
        )
        .bind(&report.target_type)
        .bind(&report.target_id)
        .fetch_one(pool)
        .await?;

        if upheld_count >= takedown_threshold {
            let notice = TakedownNotice {
                target_type: report.target_type.clone(),
                target_id: report.target_id.clone(),
                upheld_count,
            };
            tokio::spawn(async move { notifier.notify(notice).await });
        }
    }

    info!(
        "Report {} resolved as {} by moderator {}",
        report.id,
        outcome.as_str(),
        actor.id
    );
    Ok(report)
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub target_type: Option<ReportTargetType>,
    pub target_id: Option<String>,
}

/// Moderator review queue: matching reports oldest-first.
pub async fn list_reports(
    pool: &PgPool,
    filter: &ReportFilter,
) -> Result<Vec<ReportRow>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM reports
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR target_type = $2)
          AND ($3::text IS NULL OR target_id = $3)
        ORDER BY created_at ASC
        "#,
    )
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.target_type.map(|t| t.as_str()))
    .bind(filter.target_id.as_deref())
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(target_type: ReportTargetType, target: &str, reason: &str) -> ReportSubmission {
        ReportSubmission {
            target_type,
            target_id: target.to_string(),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_valid_report_passes() {
        let s = submission(ReportTargetType::Comment, "comment-9", "harassment");
        assert!(validate_submission(&s).is_ok());
    }

    #[test]
    fn test_missing_target_rejected() {
        let s = submission(ReportTargetType::Review, "", "spam");
        assert!(matches!(
            validate_submission(&s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_unrecognized_reason_rejected() {
        let s = submission(ReportTargetType::Blog, "blog-3", "bad_take");
        assert!(matches!(
            validate_submission(&s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_resolved_states_are_terminal() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(ReportStatus::Dismissed.is_terminal());
    }
}
