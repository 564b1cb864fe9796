//! Capability resolution for the acting user.
//!
//! The transport layer authenticates upstream and hands us a bare user id;
//! everything downstream consumes a [`Capabilities`] set instead of poking at
//! roles, so the capability-to-role mapping is checked in exactly one place.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Capabilities, Role};

/// The acting user: id plus the capability set their stored role grants.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub capabilities: Capabilities,
}

impl Actor {
    pub fn require_moderator(&self) -> Result<(), AppError> {
        if self.capabilities.can_moderate {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Resolves a user id to an [`Actor`]. Users without a role record are
/// treated as viewers. Analyst capabilities only take effect once the
/// analyst profile is approved.
pub async fn resolve_actor(pool: &PgPool, user_id: Uuid) -> Result<Actor, AppError> {
    let role: Option<String> =
        sqlx::query_scalar("SELECT role FROM role_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let role = role.as_deref().and_then(Role::parse).unwrap_or(Role::Viewer);
    let mut capabilities = role.capabilities();

    if role == Role::Analyst {
        let approved: Option<bool> = sqlx::query_scalar(
            "SELECT approval_status = 'approved' FROM analysts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if !approved.unwrap_or(false) {
            capabilities.can_moderate = false;
            capabilities.can_predict = false;
        }
    }

    Ok(Actor {
        id: user_id,
        capabilities,
    })
}
