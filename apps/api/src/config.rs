use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the hosted identity provider (token resolution + admin delete).
    pub auth_url: String,
    /// Service-role key for the identity provider's admin API.
    pub auth_service_key: String,
    /// OpenAI-compatible gateway used for all generation kinds except trends.
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub gateway_model: String,
    /// Separate OpenAI-compatible provider used only for trend analysis.
    pub trends_url: String,
    pub trends_api_key: String,
    pub trends_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            auth_url: require_env("AUTH_URL")?,
            auth_service_key: require_env("AUTH_SERVICE_KEY")?,
            gateway_url: std::env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1".to_string()),
            gateway_api_key: require_env("AI_GATEWAY_API_KEY")?,
            gateway_model: std::env::var("AI_GATEWAY_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
            trends_url: std::env::var("TRENDS_API_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            trends_api_key: require_env("TRENDS_API_KEY")?,
            trends_model: std::env::var("TRENDS_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
