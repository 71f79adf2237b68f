use sqlx::PgPool;

use crate::auth::AuthClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthClient,
    /// Primary completion gateway — handles every generation type except trends.
    pub llm: LlmClient,
    /// Dedicated trends provider.
    pub trends_llm: LlmClient,
}
