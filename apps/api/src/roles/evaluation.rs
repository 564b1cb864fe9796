//! Role evaluation against the trailing activity window.
//!
//! Review counts are recomputed from the `review_activity` event log on every
//! run rather than kept as a stored counter, so the number the decision sees
//! is always consistent with the events.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, RoleRecordRow};

/// Reviews required in the trailing window to hold the Reviewer role.
pub const REVIEWER_MIN_REVIEWS: i64 = 4;
/// Length of the trailing activity window, in days.
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;
/// Days between the warning and the demotion it precedes.
pub const GRACE_PERIOD_DAYS: i64 = 7;

/// Outcome of one evaluation pass. Re-running without new activity produces
/// the same decision.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDecision {
    pub role: Role,
    pub prior_role: Option<Role>,
    pub warned_at: Option<DateTime<Utc>>,
    pub audit_note: String,
}

/// Pure decision function over the current record and the recomputed
/// activity count.
pub fn decide_role(
    current: Role,
    prior_role: Option<Role>,
    warned_at: Option<DateTime<Utc>>,
    reviews_in_window: i64,
    now: DateTime<Utc>,
) -> RoleDecision {
    if current != Role::Reviewer {
        return RoleDecision {
            role: current,
            prior_role,
            warned_at,
            audit_note: format!("no activity requirement for role '{}'", current.as_str()),
        };
    }

    if reviews_in_window >= REVIEWER_MIN_REVIEWS {
        let audit_note = if warned_at.is_some() {
            format!(
                "activity recovered ({reviews_in_window} reviews in window); warning cleared"
            )
        } else {
            format!("activity requirement met ({reviews_in_window} reviews in window)")
        };
        return RoleDecision {
            role: Role::Reviewer,
            prior_role,
            warned_at: None,
            audit_note,
        };
    }

    match warned_at {
        None => RoleDecision {
            role: Role::Reviewer,
            prior_role,
            warned_at: Some(now),
            audit_note: format!(
                "below activity requirement ({reviews_in_window}/{REVIEWER_MIN_REVIEWS} reviews); warning issued, demotion in {GRACE_PERIOD_DAYS} days without corrective activity"
            ),
        },
        Some(warned) if now - warned >= Duration::days(GRACE_PERIOD_DAYS) => RoleDecision {
            role: Role::Viewer,
            prior_role: Some(Role::Reviewer),
            warned_at: None,
            audit_note: format!(
                "grace period expired with {reviews_in_window}/{REVIEWER_MIN_REVIEWS} reviews; demoted to viewer"
            ),
        },
        Some(warned) => {
            let remaining = GRACE_PERIOD_DAYS - (now - warned).num_days();
            RoleDecision {
                role: Role::Reviewer,
                prior_role,
                warned_at: Some(warned),
                audit_note: format!(
                    "below activity requirement ({reviews_in_window}/{REVIEWER_MIN_REVIEWS} reviews); {remaining} day(s) of grace remaining"
                ),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub user_id: Uuid,
    pub previous_role: Role,
    pub role: Role,
    pub reviews_in_window: i64,
    pub audit_note: String,
}

/// Runs one evaluation pass for a user and persists the result.
pub async fn evaluate(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<EvaluationOutcome, AppError> {
    let record: Option<RoleRecordRow> =
        sqlx::query_as("SELECT * FROM role_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    let record = record
        .ok_or_else(|| AppError::NotFound(format!("No role record for user {user_id}")))?;

    let current = Role::parse(&record.role)
        .ok_or_else(|| anyhow::anyhow!("corrupt role '{}' for user {user_id}", record.role))?;
    let prior_role = record.prior_role.as_deref().and_then(Role::parse);

    let window_start = now - Duration::days(ACTIVITY_WINDOW_DAYS);
    let reviews_in_window: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM review_activity WHERE user_id = $1 AND created_at > $2 AND created_at <= $3",
    )
    .bind(user_id)
    .bind(window_start)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let decision = decide_role(current, prior_role, record.warned_at, reviews_in_window, now);

    sqlx::query(
        r#"
        UPDATE role_records
        SET role = $2, prior_role = $3, warned_at = $4, last_evaluated_at = $5
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(decision.role.as_str())
    .bind(decision.prior_role.map(|r| r.as_str()))
    .bind(decision.warned_at)
    .bind(now)
    .execute(pool)
    .await?;

    if decision.role != current {
        info!(
            "Role change for user {user_id}: {} -> {} ({})",
            current.as_str(),
            decision.role.as_str(),
            decision.audit_note
        );
    }

    Ok(EvaluationOutcome {
        user_id,
        previous_role: current,
        role: decision.role,
        reviews_in_window,
        audit_note: decision.audit_note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_active_reviewer_retained() {
        let d = decide_role(Role::Reviewer, None, None, 4, at(15));
        assert_eq!(d.role, Role::Reviewer);
        assert!(d.warned_at.is_none());
    }

    #[test]
    fn test_below_threshold_issues_warning() {
        let now = at(15);
        let d = decide_role(Role::Reviewer, None, None, 3, now);
        assert_eq!(d.role, Role::Reviewer);
        assert_eq!(d.warned_at, Some(now));
        assert!(d.audit_note.contains("warning issued"));
    }

    #[test]
    fn test_warning_is_idempotent_within_grace() {
        let warned = at(10);
        let d = decide_role(Role::Reviewer, None, Some(warned), 2, at(12));
        assert_eq!(d.role, Role::Reviewer);
        // re-running does not move the grace clock
        assert_eq!(d.warned_at, Some(warned));
    }

    #[test]
    fn test_demotion_after_grace_expiry() {
        let d = decide_role(Role::Reviewer, None, Some(at(1)), 0, at(8));
        assert_eq!(d.role, Role::Viewer);
        assert_eq!(d.prior_role, Some(Role::Reviewer));
        assert!(d.warned_at.is_none());
    }

    #[test]
    fn test_no_demotion_one_day_before_expiry() {
        let d = decide_role(Role::Reviewer, None, Some(at(1)), 0, at(7));
        assert_eq!(d.role, Role::Reviewer);
    }

    #[test]
    fn test_recovery_clears_warning() {
        let d = decide_role(Role::Reviewer, None, Some(at(1)), 5, at(6));
        assert_eq!(d.role, Role::Reviewer);
        assert!(d.warned_at.is_none());
        assert!(d.audit_note.contains("warning cleared"));
    }

    #[test]
    fn test_threshold_is_exactly_four() {
        assert!(decide_role(Role::Reviewer, None, None, 4, at(15))
            .warned_at
            .is_none());
        assert!(decide_role(Role::Reviewer, None, None, 3, at(15))
            .warned_at
            .is_some());
    }

    #[test]
    fn test_non_reviewer_roles_untouched() {
        for role in [Role::Viewer, Role::Filmmaker, Role::Analyst] {
            let d = decide_role(role, None, None, 0, at(15));
            assert_eq!(d.role, role);
            assert!(d.warned_at.is_none());
        }
    }

    #[test]
    fn test_demoted_viewer_is_stable_on_rerun() {
        // After demotion the record is (viewer, prior=reviewer); re-running
        // evaluation must not change anything.
        let d = decide_role(Role::Viewer, Some(Role::Reviewer), None, 0, at(20));
        assert_eq!(d.role, Role::Viewer);
        assert_eq!(d.prior_role, Some(Role::Reviewer));
    }
}
