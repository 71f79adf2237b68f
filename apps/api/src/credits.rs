/// Credit accounting for metered generation.
///
/// Balances live on the profiles row. Checks happen before any provider
/// call; the deduction happens after the call succeeds, as a conditional
/// decrement so concurrent requests cannot push a balance negative. A
/// settlement that fails is logged and the response still goes out — the
/// user already has their content at that point.
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Credits granted when an admin approves a top-up payment.
pub const TOPUP_CREDITS: i64 = 100;

/// Loads the caller's current balance.
pub async fn fetch_credits(pool: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
    let credits: Option<i64> = sqlx::query_scalar("SELECT credits FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    credits.ok_or(AppError::ProfileNotFound)
}

/// Deducts `cost` from the balance after a successful generation and returns
/// the credits remaining.
///
/// The decrement only applies while the balance still covers the cost, so a
/// concurrent spend cannot drive it below zero. Both the skipped case and a
/// database failure are swallowed: the content has already been produced, so
/// the response reports `balance - cost` and the discrepancy is logged.
pub async fn settle_deduction(pool: &PgPool, user_id: Uuid, balance: i64, cost: i64) -> i64 {
    let result: Result<Option<i64>, sqlx::Error> = sqlx::query_scalar(
        r#"
        UPDATE profiles
        SET credits = credits - $1
        WHERE id = $2 AND credits >= $1
        RETURNING credits
        "#,
    )
    .bind(cost)
    .bind(user_id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(remaining)) => remaining,
        Ok(None) => {
            warn!(
                "Credit deduction skipped for user {}: balance moved below cost {}",
                user_id, cost
            );
            balance - cost
        }
        Err(e) => {
            error!("Credit deduction failed for user {}: {}", user_id, e);
            balance - cost
        }
    }
}

/// Adds credits to a user's balance. Used by payment approval.
pub async fn grant_credits(pool: &PgPool, user_id: Uuid, amount: i64) -> Result<i64, AppError> {
    let credits: Option<i64> = sqlx::query_scalar(
        "UPDATE profiles SET credits = credits + $1 WHERE id = $2 RETURNING credits",
    )
    .bind(amount)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    credits.ok_or(AppError::ProfileNotFound)
}

/// Overwrites a user's balance. Admin-only.
pub async fn set_credits(pool: &PgPool, user_id: Uuid, credits: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE profiles SET credits = $1 WHERE id = $2")
        .bind(credits)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    Ok(())
}
