//! Axum route handlers for the generation API.

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::Value;

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::generation::dispatcher::dispatch;
use crate::generation::plan::GenerateRequest;
use crate::models::generation::GenerationRow;
use crate::state::AppState;

/// POST /api/v1/generate
///
/// Credit-gated generation. Checks the caller's balance, calls the provider
/// configured for the requested type, and returns the shaped payload —
/// with `creditsRemaining` for every charged type.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, AppError> {
    let user = authenticate(&state.auth, &headers).await?;
    let payload = dispatch(&state.db, &state.llm, &state.trends_llm, user.id, request).await?;
    Ok(Json(payload))
}

/// GET /api/v1/generations
///
/// The caller's generation history, newest first. Only standard SEO
/// generations persist, so only those appear here.
pub async fn handle_list_generations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<GenerationRow>>, AppError> {
    let user = authenticate(&state.auth, &headers).await?;

    let generations = sqlx::query_as::<_, GenerationRow>(
        "SELECT * FROM generations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(generations))
}
