//! Axum route handlers for the admin dashboard and actions endpoint.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::admin::actions::{delete_user_account, require_admin};
use crate::auth::authenticate;
use crate::credits::{grant_credits, set_credits, TOPUP_CREDITS};
use crate::errors::AppError;
use crate::models::generation::AdminGenerationRow;
use crate::models::payment::PendingPaymentRow;
use crate::models::profile::ProfileRow;
use crate::state::AppState;

/// How many recent generations the dashboard shows.
const RECENT_GENERATIONS_LIMIT: i64 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdminActionRequest {
    pub action: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AdminActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct AdminStats {
    pub users: i64,
    pub generations: i64,
    pub credits: i64,
    pub pending_payments: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentDecisionResponse {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCreditsRequest {
    pub credits: i64,
}

#[derive(Debug, Serialize)]
pub struct SetCreditsResponse {
    pub id: Uuid,
    pub credits: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Actions endpoint
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/admin/actions
///
/// Action-dispatch side channel. `delete_user` is the only action; anything
/// else is rejected with a 400.
pub async fn handle_admin_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdminActionRequest>,
) -> Result<Json<AdminActionResponse>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    match request.action.as_str() {
        "delete_user" => {
            delete_user_account(&state.db, &state.auth, request.user_id).await?;
            Ok(Json(AdminActionResponse {
                success: true,
                message: "User deleted successfully".to_string(),
            }))
        }
        other => Err(AppError::InvalidAction(other.to_string())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard queries
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/stats
///
/// Headline numbers for the dashboard cards. Revenue counts approved
/// payment requests only.
pub async fn handle_admin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminStats>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let stats = sqlx::query_as::<_, AdminStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM profiles) AS users,
            (SELECT COUNT(*) FROM generations) AS generations,
            (SELECT COALESCE(SUM(credits), 0)::bigint FROM profiles) AS credits,
            (SELECT COUNT(*) FROM payment_requests WHERE status = 'pending') AS pending_payments,
            (SELECT COALESCE(SUM(amount), 0)::bigint FROM payment_requests WHERE status = 'approved') AS total_revenue
        "#,
    )
    .fetch_one(&state.db)
    .await?;

    Ok(Json(stats))
}

/// GET /api/v1/admin/users
///
/// Every profile, newest first.
pub async fn handle_admin_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProfileRow>>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let users = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users))
}

/// GET /api/v1/admin/generations
///
/// The most recent generations across all users, with owner emails.
pub async fn handle_admin_generations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminGenerationRow>>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let generations = sqlx::query_as::<_, AdminGenerationRow>(
        r#"
        SELECT g.id, g.user_id, p.email, g.topic, g.title, g.created_at
        FROM generations g
        LEFT JOIN profiles p ON p.id = g.user_id
        ORDER BY g.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_GENERATIONS_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(generations))
}

/// GET /api/v1/admin/payments
///
/// The pending payment queue, oldest first, with payer emails.
pub async fn handle_admin_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PendingPaymentRow>>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let payments = sqlx::query_as::<_, PendingPaymentRow>(
        r#"
        SELECT pr.id, pr.user_id, p.email, pr.gmail, pr.amount, pr.status, pr.created_at
        FROM payment_requests pr
        LEFT JOIN profiles p ON p.id = pr.user_id
        WHERE pr.status = 'pending'
        ORDER BY pr.created_at
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(payments))
}

// ────────────────────────────────────────────────────────────────────────────
// Payment decisions and credit adjustments
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/admin/payments/:id/approve
///
/// Approves a pending request and grants the top-up credits. The status
/// guard makes approval single-shot: a second approve returns 404 instead
/// of granting credits twice.
pub async fn handle_approve_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<PaymentDecisionResponse>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let payer: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE payment_requests
        SET status = 'approved'
        WHERE id = $1 AND status = 'pending'
        RETURNING user_id
        "#,
    )
    .bind(payment_id)
    .fetch_optional(&state.db)
    .await?;

    let payer = payer
        .ok_or_else(|| AppError::NotFound(format!("Pending payment {payment_id} not found")))?;

    grant_credits(&state.db, payer, TOPUP_CREDITS).await?;

    info!(
        "Payment {} approved: granted {} credits to user {}",
        payment_id, TOPUP_CREDITS, payer
    );

    Ok(Json(PaymentDecisionResponse {
        id: payment_id,
        status: "approved".to_string(),
    }))
}

/// POST /api/v1/admin/payments/:id/reject
pub async fn handle_reject_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<PaymentDecisionResponse>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    let rejected: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE payment_requests
        SET status = 'rejected'
        WHERE id = $1 AND status = 'pending'
        RETURNING id
        "#,
    )
    .bind(payment_id)
    .fetch_optional(&state.db)
    .await?;

    if rejected.is_none() {
        return Err(AppError::NotFound(format!(
            "Pending payment {payment_id} not found"
        )));
    }

    info!("Payment {} rejected", payment_id);

    Ok(Json(PaymentDecisionResponse {
        id: payment_id,
        status: "rejected".to_string(),
    }))
}

/// PATCH /api/v1/admin/users/:id/credits
///
/// Overwrites a user's balance with the given value.
pub async fn handle_set_credits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetCreditsRequest>,
) -> Result<Json<SetCreditsResponse>, AppError> {
    let caller = authenticate(&state.auth, &headers).await?;
    require_admin(&state.db, caller.id).await?;

    if body.credits < 0 {
        return Err(AppError::Validation(
            "credits cannot be negative".to_string(),
        ));
    }

    set_credits(&state.db, user_id, body.credits).await?;

    info!(
        "Admin {} set credits for user {} to {}",
        caller.id, user_id, body.credits
    );

    Ok(Json(SetCreditsResponse {
        id: user_id,
        credits: body.credits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_action_request_uses_camel_case_user_id() {
        let json = serde_json::json!({
            "action": "delete_user",
            "userId": "b5fdd9a4-96cd-4f35-9d1f-6a2f62f4b1f0"
        });
        let request: AdminActionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.action, "delete_user");
        assert_eq!(
            request.user_id,
            "b5fdd9a4-96cd-4f35-9d1f-6a2f62f4b1f0".parse::<Uuid>().unwrap()
        );
    }

    #[test]
    fn test_admin_action_request_rejects_missing_user_id() {
        let json = serde_json::json!({ "action": "delete_user" });
        let result: Result<AdminActionRequest, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
