//! Axum route handlers for payment requests.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentRequestBody {
    pub gmail: String,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentRequestResponse {
    pub id: Uuid,
    pub status: String,
}

/// POST /api/v1/payments
///
/// Records a manual top-up claim for admin review. The request starts out
/// pending; an admin approval later grants the plan's credits.
pub async fn handle_create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PaymentRequestBody>,
) -> Result<Json<PaymentRequestResponse>, AppError> {
    let user = authenticate(&state.auth, &headers).await?;

    if body.gmail.trim().is_empty() {
        return Err(AppError::Validation("gmail cannot be empty".to_string()));
    }
    if body.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".to_string()));
    }

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO payment_requests (user_id, gmail, amount, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id
        "#,
    )
    .bind(user.id)
    .bind(body.gmail.trim())
    .bind(body.amount)
    .fetch_one(&state.db)
    .await?;

    info!("Payment request {} created by user {}", id, user.id);

    Ok(Json(PaymentRequestResponse {
        id,
        status: "pending".to_string(),
    }))
}
