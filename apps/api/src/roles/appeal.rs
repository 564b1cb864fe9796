//! Applies resolved role-appeal flags back onto the role ledger.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::flag::{FlagKind, FlagRow, FlagStatus};
use crate::models::user::{Role, RoleRecordRow};

/// New ledger state after an appeal outcome is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AppealApplication {
    pub role: Role,
    pub prior_role: Option<Role>,
    pub warned_at: Option<DateTime<Utc>>,
    pub audit_note: String,
}

/// Pure mapping from (current ledger state, appeal outcome) to the new state.
///
/// Approved: reinstate the pre-demotion role if one was recorded, otherwise
/// preserve the current role; either way the grace clock resets. Rejected:
/// a still-pending demotion is finalized immediately; an already-applied
/// demotion stands.
pub fn apply_outcome(
    current: Role,
    prior_role: Option<Role>,
    warned_at: Option<DateTime<Utc>>,
    outcome: FlagStatus,
) -> AppealApplication {
    match outcome {
        FlagStatus::Approved => match prior_role {
            Some(restored) => AppealApplication {
                role: restored,
                prior_role: None,
                warned_at: None,
                audit_note: format!("appeal approved; reinstated as {}", restored.as_str()),
            },
            None => AppealApplication {
                role: current,
                prior_role: None,
                warned_at: None,
                audit_note: format!(
                    "appeal approved; {} preserved and grace clock reset",
                    current.as_str()
                ),
            },
        },
        FlagStatus::Rejected => {
            if current == Role::Reviewer && warned_at.is_some() {
                AppealApplication {
                    role: Role::Viewer,
                    prior_role: Some(Role::Reviewer),
                    warned_at: None,
                    audit_note: "appeal rejected; pending demotion finalized".to_string(),
                }
            } else {
                AppealApplication {
                    role: current,
                    prior_role,
                    warned_at: None,
                    audit_note: "appeal rejected; demotion stands".to_string(),
                }
            }
        }
        FlagStatus::Pending => AppealApplication {
            role: current,
            prior_role,
            warned_at,
            audit_note: "appeal unresolved; ledger unchanged".to_string(),
        },
    }
}

/// Applies a resolved `reviewer_role_appeal` flag to the appellant's ledger
/// record. Called by the moderation engine after the flag transitions out of
/// `Pending`.
pub async fn apply_appeal_outcome(
    pool: &PgPool,
    flag: &FlagRow,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    debug_assert_eq!(flag.kind, FlagKind::ReviewerRoleAppeal.as_str());

    let outcome = FlagStatus::parse(&flag.status)
        .ok_or_else(|| anyhow::anyhow!("corrupt flag status '{}'", flag.status))?;

    let appellant: Uuid = flag
        .target_ref
        .parse()
        .map_err(|_| anyhow::anyhow!("appeal target '{}' is not a user id", flag.target_ref))?;

    let record: Option<RoleRecordRow> =
        sqlx::query_as("SELECT * FROM role_records WHERE user_id = $1")
            .bind(appellant)
            .fetch_optional(pool)
            .await?;
    let record = record
        .ok_or_else(|| AppError::NotFound(format!("No role record for user {appellant}")))?;

    let current = Role::parse(&record.role)
        .ok_or_else(|| anyhow::anyhow!("corrupt role '{}' for user {appellant}", record.role))?;
    let prior_role = record.prior_role.as_deref().and_then(Role::parse);

    let applied = apply_outcome(current, prior_role, record.warned_at, outcome);

    sqlx::query(
        r#"
        UPDATE role_records
        SET role = $2, prior_role = $3, warned_at = $4, last_evaluated_at = $5
        WHERE user_id = $1
        "#,
    )
    .bind(appellant)
    .bind(applied.role.as_str())
    .bind(applied.prior_role.map(|r| r.as_str()))
    .bind(applied.warned_at)
    .bind(now)
    .execute(pool)
    .await?;

    info!(
        "Applied appeal {} for user {appellant}: {}",
        flag.id, applied.audit_note
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn warned() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_approved_reinstates_prior_role() {
        let a = apply_outcome(
            Role::Viewer,
            Some(Role::Reviewer),
            None,
            FlagStatus::Approved,
        );
        assert_eq!(a.role, Role::Reviewer);
        assert!(a.prior_role.is_none());
        assert!(a.warned_at.is_none());
    }

    #[test]
    fn test_approved_before_demotion_preserves_role_and_resets_clock() {
        let a = apply_outcome(Role::Reviewer, None, warned(), FlagStatus::Approved);
        assert_eq!(a.role, Role::Reviewer);
        assert!(a.warned_at.is_none());
    }

    #[test]
    fn test_rejected_finalizes_pending_demotion() {
        let a = apply_outcome(Role::Reviewer, None, warned(), FlagStatus::Rejected);
        assert_eq!(a.role, Role::Viewer);
        assert_eq!(a.prior_role, Some(Role::Reviewer));
        assert!(a.warned_at.is_none());
    }

    #[test]
    fn test_rejected_after_demotion_keeps_demoted_role() {
        let a = apply_outcome(
            Role::Viewer,
            Some(Role::Reviewer),
            None,
            FlagStatus::Rejected,
        );
        assert_eq!(a.role, Role::Viewer);
        // prior role retained so a later (post-cooldown) appeal can still reinstate
        assert_eq!(a.prior_role, Some(Role::Reviewer));
    }

    #[test]
    fn test_pending_outcome_changes_nothing() {
        let a = apply_outcome(Role::Reviewer, None, warned(), FlagStatus::Pending);
        assert_eq!(a.role, Role::Reviewer);
        assert_eq!(a.warned_at, warned());
    }
}
