//! Flag lifecycle: submission validation, the Pending → Approved/Rejected
//! transition, and the moderator review queue.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Actor;
use crate::models::flag::{FlagKind, FlagRow, FlagStatus};
use crate::moderation::reasons::is_recognized_flag_reason;
use crate::roles::appeal::apply_appeal_outcome;

/// Days a user must wait after a resolved appeal before re-appealing.
pub const APPEAL_COOLDOWN_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct FlagSubmission {
    pub kind: FlagKind,
    pub target_ref: String,
    pub reason: String,
    pub description: String,
    pub evidence_ref: Option<String>,
}

/// Submission-time input checks. Pure; storage-backed preconditions
/// (duplicate appeal, cooldown) are checked separately.
pub fn validate_submission(submitter: Uuid, submission: &FlagSubmission) -> Result<(), AppError> {
    if submission.target_ref.trim().is_empty() {
        return Err(AppError::Validation("Flag target is required".to_string()));
    }
    if !is_recognized_flag_reason(submission.kind, &submission.reason) {
        return Err(AppError::Validation(format!(
            "Reason '{}' is not recognized for {} flags",
            submission.reason,
            submission.kind.as_str()
        )));
    }
    if submission.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Flag description must not be empty".to_string(),
        ));
    }
    if submission.kind == FlagKind::ReviewerRoleAppeal
        && submission.target_ref != submitter.to_string()
    {
        return Err(AppError::Validation(
            "Role appeals must target the submitting user".to_string(),
        ));
    }
    Ok(())
}

/// True while a prior resolution still blocks a re-appeal.
pub fn within_cooldown(resolved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - resolved_at < Duration::days(APPEAL_COOLDOWN_DAYS)
}

/// Creates a flag in `Pending`.
///
/// Role appeals additionally require the appeal capability, at most one open
/// appeal per user, and a lapsed cooldown since the user's last resolved
/// appeal; a post-cooldown re-appeal is chained to the prior flag.
pub async fn submit_flag(
    pool: &PgPool,
    actor: &Actor,
    submission: FlagSubmission,
    now: DateTime<Utc>,
) -> Result<FlagRow, AppError> {
    validate_submission(actor.id, &submission)?;

    let mut references_flag_id: Option<Uuid> = None;
    if submission.kind == FlagKind::ReviewerRoleAppeal {
        if !actor.capabilities.can_appeal {
            return Err(AppError::Forbidden);
        }

        let has_pending: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM flags
                WHERE submitter_id = $1 AND kind = 'reviewer_role_appeal' AND status = 'pending'
            )
            "#,
        )
        .bind(actor.id)
        .fetch_one(pool)
        .await?;
        if has_pending {
            return Err(AppError::DuplicateAppeal(format!(
                "User {} already has a pending role appeal",
                actor.id
            )));
        }

        let prior: Option<(Uuid, Option<DateTime<Utc>>)> = sqlx::query_as(
            r#"
            SELECT id, resolved_at FROM flags
            WHERE submitter_id = $1 AND kind = 'reviewer_role_appeal' AND status <> 'pending'
            ORDER BY resolved_at DESC
            LIMIT 1
            "#,
        )
        .bind(actor.id)
        .fetch_optional(pool)
        .await?;

        if let Some((prior_id, Some(resolved_at))) = prior {
            if within_cooldown(resolved_at, now) {
                return Err(AppError::Validation(format!(
                    "Re-appeal is only accepted {APPEAL_COOLDOWN_DAYS} days after the prior resolution"
                )));
            }
            references_flag_id = Some(prior_id);
        }
    }

    let flag: FlagRow = sqlx::query_as(
        r#"
        INSERT INTO flags
            (id, submitter_id, kind, target_ref, reason, description, evidence_ref,
             references_flag_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor.id)
    .bind(submission.kind.as_str())
    .bind(&submission.target_ref)
    .bind(&submission.reason)
    .bind(&submission.description)
    .bind(submission.evidence_ref.as_deref())
    .bind(references_flag_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!(
        "Flag {} submitted by {} ({} against {})",
        flag.id,
        actor.id,
        submission.kind.as_str(),
        submission.target_ref
    );
    Ok(flag)
}

/// Resolves a pending flag to `Approved` or `Rejected`.
///
/// The transition is guarded against the record's current status, so of two
/// concurrent resolvers exactly one wins; the loser observes
/// `InvalidTransition`. Approved/rejected role appeals are applied to the
/// role ledger before returning.
pub async fn resolve_flag(
    pool: &PgPool,
    actor: &Actor,
    flag_id: Uuid,
    outcome: FlagStatus,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<FlagRow, AppError> {
    actor.require_moderator()?;
    debug_assert!(outcome.is_terminal());

    let resolved: Option<FlagRow> = sqlx::query_as(
        r#"
        UPDATE flags
        SET status = $2, reviewer_id = $3, resolution_note = $4, resolved_at = $5
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(flag_id)
    .bind(outcome.as_str())
    .bind(actor.id)
    .bind(note.as_deref())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    let flag = match resolved {
        Some(flag) => flag,
        None => {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM flags WHERE id = $1")
                    .bind(flag_id)
                    .fetch_optional(pool)
                    .await?;
            return Err(match current {
                None => AppError::NotFound(format!("Flag {flag_id} not found")),
                Some(status) => AppError::InvalidTransition(format!(
                    "Flag {flag_id} is already {status}"
                )),
            });
        }
    };

    if flag.kind == FlagKind::ReviewerRoleAppeal.as_str() {
        apply_appeal_outcome(pool, &flag, now).await?;
    }

    info!(
        "Flag {} resolved as {} by moderator {}",
        flag.id,
        outcome.as_str(),
        actor.id
    );
    Ok(flag)
}

#[derive(Debug, Clone, Default)]
pub struct FlagFilter {
    pub status: Option<FlagStatus>,
    pub kind: Option<FlagKind>,
    pub target_ref: Option<String>,
}

/// Moderator review queue: matching flags oldest-first.
pub async fn list_flags(pool: &PgPool, filter: &FlagFilter) -> Result<Vec<FlagRow>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM flags
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR kind = $2)
          AND ($3::text IS NULL OR target_ref = $3)
        ORDER BY created_at ASC
        "#,
    )
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.kind.map(|k| k.as_str()))
    .bind(filter.target_ref.as_deref())
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(kind: FlagKind, target: &str, reason: &str, description: &str) -> FlagSubmission {
        FlagSubmission {
            kind,
            target_ref: target.to_string(),
            reason: reason.to_string(),
            description: description.to_string(),
            evidence_ref: None,
        }
    }

    #[test]
    fn test_valid_complaint_passes() {
        let s = submission(
            FlagKind::ContentComplaint,
            "review-42",
            "spam",
            "Link farm in the review body",
        );
        assert!(validate_submission(Uuid::new_v4(), &s).is_ok());
    }

    #[test]
    fn test_valid_appeal_targets_self() {
        let submitter = Uuid::new_v4();
        let s = submission(
            FlagKind::ReviewerRoleAppeal,
            &submitter.to_string(),
            "unfair_demotion",
            "Review count missed my festival coverage",
        );
        assert!(validate_submission(submitter, &s).is_ok());
    }

    #[test]
    fn test_appeal_for_another_user_rejected() {
        let s = submission(
            FlagKind::ReviewerRoleAppeal,
            &Uuid::new_v4().to_string(),
            "unfair_demotion",
            "text",
        );
        assert!(matches!(
            validate_submission(Uuid::new_v4(), &s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_target_rejected() {
        let s = submission(FlagKind::ContentComplaint, "  ", "spam", "spammy");
        assert!(matches!(
            validate_submission(Uuid::new_v4(), &s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_unrecognized_reason_rejected() {
        let s = submission(FlagKind::ContentComplaint, "review-42", "meh", "text");
        assert!(matches!(
            validate_submission(Uuid::new_v4(), &s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_reason_set_depends_on_kind() {
        // valid appeal reason on a content complaint is rejected
        let s = submission(
            FlagKind::ContentComplaint,
            "review-42",
            "unfair_demotion",
            "text",
        );
        assert!(validate_submission(Uuid::new_v4(), &s).is_err());
    }

    #[test]
    fn test_blank_description_rejected() {
        let submitter = Uuid::new_v4();
        let s = submission(
            FlagKind::ReviewerRoleAppeal,
            &submitter.to_string(),
            "unfair_demotion",
            " \t",
        );
        assert!(matches!(
            validate_submission(submitter, &s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_cooldown_blocks_before_thirty_days() {
        let resolved = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let day_29 = Utc.with_ymd_and_hms(2024, 5, 30, 0, 0, 0).unwrap();
        let day_30 = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        assert!(within_cooldown(resolved, day_29));
        assert!(!within_cooldown(resolved, day_30));
    }

    #[test]
    fn test_resolved_states_are_terminal() {
        assert!(!FlagStatus::Pending.is_terminal());
        assert!(FlagStatus::Approved.is_terminal());
        assert!(FlagStatus::Rejected.is_terminal());
    }
}
