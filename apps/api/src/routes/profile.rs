use axum::{extract::State, http::HeaderMap, Json};

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::state::AppState;

/// GET /api/v1/profile
/// Returns the caller's profile, including the current credit balance.
pub async fn profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileRow>, AppError> {
    let user = authenticate(&state.auth, &headers).await?;

    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::ProfileNotFound)?;

    Ok(Json(profile))
}
