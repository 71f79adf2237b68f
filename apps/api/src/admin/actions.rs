//! Admin capability check and the privileged account-deletion action.

use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthClient;
use crate::errors::AppError;

/// Confirms the caller holds the admin role. The role table is the only
/// source of truth here.
pub async fn require_admin(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let role: Option<String> =
        sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1 AND role = 'admin'")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if role.is_none() {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

/// Deletes a user's identity and profile row.
///
/// Identity deletion is idempotent: an already-missing identity still counts
/// as deleted, so calling this twice for the same user succeeds both times.
/// The profile cleanup runs regardless and is best-effort; a failure there
/// is logged, not surfaced.
pub async fn delete_user_account(
    pool: &PgPool,
    auth: &AuthClient,
    user_id: Uuid,
) -> Result<(), AppError> {
    auth.delete_user(user_id).await?;

    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await;

    if let Err(e) = result {
        error!("Failed to delete profile {}: {}", user_id, e);
    }

    info!("Deleted user {} from identity store and profiles", user_id);
    Ok(())
}
