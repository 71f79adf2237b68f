/// LLM client — the single point of entry for chat-completion calls in SEOverse.
///
/// ARCHITECTURAL RULE: No other module may call a completion provider directly.
/// All model interactions MUST go through this module.
///
/// The wire format is the OpenAI-compatible `/chat/completions` shape, which
/// both the primary gateway and the trends provider speak. Calls are made
/// exactly once per request: provider failures surface as typed errors and
/// are never retried here.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rate limited")]
    RateLimited,

    #[error("Provider payment required")]
    PaymentRequired,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Parameters for a single chat-completion call.
#[derive(Debug, Clone, Copy)]
pub struct ChatParams<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Ask the provider to constrain output to a JSON object
    /// (`response_format: {"type": "json_object"}`), where supported.
    pub json_response: bool,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// A configured chat-completion provider. `AppState` carries two instances:
/// the primary gateway and the trends provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single chat-completion call and returns the assistant's text.
    ///
    /// 429 maps to `RateLimited`, 402 to `PaymentRequired`, any other non-2xx
    /// to `Api`. Missing or empty message content maps to `EmptyContent`.
    pub async fn chat(&self, params: ChatParams<'_>) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: params.system,
                },
                ChatMessage {
                    role: "user",
                    content: params.user,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            response_format: params.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!(
            "LLM call succeeded: model={}, content_len={}",
            self.model,
            content.len()
        );

        Ok(content)
    }
}

/// Maps a non-2xx provider status to a typed error.
fn classify_failure(status: u16, body: String) -> LlmError {
    match status {
        429 => LlmError::RateLimited,
        402 => LlmError::PaymentRequired,
        _ => {
            // Prefer the provider's structured error message when present
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            LlmError::Api { status, message }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Models wrap JSON payloads in Markdown fences often enough that every
/// structured parse goes through this first. A complete fenced block is
/// honored wherever it sits, so prose before or after the fence is
/// dropped; without one, a leading fence is trimmed and the rest passes
/// through.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(inner) = fenced_object(text) {
        return inner;
    }
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// The outermost `{...}` inside the first complete fenced block. None when
/// no closed fence exists or the block holds no object (fenced arrays take
/// the leading-fence path instead).
fn fenced_object(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let body = &text[start + 3..];
    let body = &body[..body.find("```")?];
    let open = body.find('{')?;
    let close = body.rfind('}')?;
    if close < open {
        return None;
    }
    Some(&body[open..=close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_unterminated_fence() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_extracts_block_from_prose() {
        let input =
            "Here is the JSON you asked for:\n```json\n{\"key\": \"value\"}\n```\nLet me know!";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_drops_trailing_commentary() {
        let input = "```json\n{\"a\": 1}\n```\nHope that helps!";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_classify_failure_rate_limited() {
        assert!(matches!(
            classify_failure(429, String::new()),
            LlmError::RateLimited
        ));
    }

    #[test]
    fn test_classify_failure_payment_required() {
        assert!(matches!(
            classify_failure(402, String::new()),
            LlmError::PaymentRequired
        ));
    }

    #[test]
    fn test_classify_failure_extracts_provider_message() {
        let body = r#"{"error": {"message": "model overloaded"}}"#.to_string();
        match classify_failure(500, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_failure_falls_back_to_raw_body() {
        let body = "bad gateway".to_string();
        match classify_failure(502, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
