//! Output shaping — turns raw model text into the response payloads the
//! clients consume. Structured types go through fence-stripping and a strict
//! JSON parse; plain-text types get line-level cleanup where the clients
//! expect it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use crate::errors::AppError;
use crate::llm_client::strip_json_fences;

/// Upper bound on idea strings returned from one brainstorm call.
pub const MAX_IDEAS: usize = 10;

/// Parses a structured model response after removing any Markdown fences.
pub fn parse_structured(content: &str) -> Result<Value, AppError> {
    let cleaned = strip_json_fences(content);
    serde_json::from_str(cleaned).map_err(|e| {
        error!("Failed to parse AI response: {}", content);
        AppError::MalformedAiResponse(e.to_string())
    })
}

/// Merges `creditsRemaining` into a structured payload. The payload must be
/// a JSON object for the merge to make sense.
pub fn attach_credits(mut payload: Value, credits_remaining: i64) -> Result<Value, AppError> {
    match payload.as_object_mut() {
        Some(map) => {
            map.insert("creditsRemaining".to_string(), json!(credits_remaining));
            Ok(payload)
        }
        None => Err(AppError::MalformedAiResponse(
            "expected a JSON object at the top level".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SEO payload
// ────────────────────────────────────────────────────────────────────────────

/// The SEO metadata extracted from the model response. `tags` and `keywords`
/// coerce to empty arrays when the model omits them or returns a non-array,
/// so downstream persistence never sees a malformed shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoContent {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce_string_array")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "coerce_string_array")]
    pub keywords: Vec<String>,
    pub meta_description: Option<String>,
}

impl SeoContent {
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        serde_json::from_value(value).map_err(|e| AppError::MalformedAiResponse(e.to_string()))
    }
}

fn coerce_string_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Idea lists
// ────────────────────────────────────────────────────────────────────────────

/// Splits a numbered-list response into at most [`MAX_IDEAS`] trimmed,
/// de-numbered idea strings. Accepts `1. idea`, `2) idea`, and `- idea`
/// shapes; lines without a list marker are skipped.
pub fn parse_idea_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(strip_list_marker)
        .filter(|idea| !idea.is_empty())
        .map(str::to_string)
        .take(MAX_IDEAS)
        .collect()
}

fn strip_list_marker(line: &str) -> Option<&str> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('-') {
        return Some(rest.trim_start());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..]
        .strip_prefix('.')
        .or_else(|| line[digits..].strip_prefix(')'))?;
    Some(rest.trim_start())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_strips_fences() {
        let wrapped = "```json\n{\"a\":1}\n```";
        assert_eq!(parse_structured(wrapped).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_structured_accepts_bare_json() {
        assert_eq!(parse_structured("{\"a\":1}").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_structured_rejects_free_text() {
        let result = parse_structured("Sure! Here are some great hashtags for you.");
        assert!(matches!(result, Err(AppError::MalformedAiResponse(_))));
    }

    #[test]
    fn test_attach_credits_merges_into_object() {
        let merged = attach_credits(json!({"hashtags": ["#a"]}), 7).unwrap();
        assert_eq!(merged["hashtags"], json!(["#a"]));
        assert_eq!(merged["creditsRemaining"], json!(7));
    }

    #[test]
    fn test_attach_credits_rejects_non_object() {
        let result = attach_credits(json!(["a", "b"]), 7);
        assert!(matches!(result, Err(AppError::MalformedAiResponse(_))));
    }

    #[test]
    fn test_seo_content_coerces_missing_arrays() {
        let seo = SeoContent::from_value(json!({
            "title": "Ten Rust Tips",
            "description": "A video about Rust.",
            "meta_description": "Rust tips."
        }))
        .unwrap();
        assert_eq!(seo.tags, Vec::<String>::new());
        assert_eq!(seo.keywords, Vec::<String>::new());
    }

    #[test]
    fn test_seo_content_coerces_non_array_values() {
        let seo = SeoContent::from_value(json!({
            "tags": "rust, tips",
            "keywords": {"rust": true}
        }))
        .unwrap();
        assert!(seo.tags.is_empty());
        assert!(seo.keywords.is_empty());
        assert!(seo.title.is_none());
    }

    #[test]
    fn test_seo_content_keeps_string_elements_only() {
        let seo = SeoContent::from_value(json!({
            "tags": ["rust", 42, "tips", null],
            "keywords": ["cargo"]
        }))
        .unwrap();
        assert_eq!(seo.tags, vec!["rust".to_string(), "tips".to_string()]);
        assert_eq!(seo.keywords, vec!["cargo".to_string()]);
    }

    #[test]
    fn test_seo_content_rejects_top_level_array() {
        let result = SeoContent::from_value(json!(["not", "an", "object"]));
        assert!(matches!(result, Err(AppError::MalformedAiResponse(_))));
    }

    #[test]
    fn test_parse_idea_list_denumbers_and_trims() {
        let content = "1. Build a CLI in a weekend\n2.  Rust vs Go speedrun \n3) Borrow checker explained";
        let ideas = parse_idea_list(content);
        assert_eq!(
            ideas,
            vec![
                "Build a CLI in a weekend",
                "Rust vs Go speedrun",
                "Borrow checker explained"
            ]
        );
    }

    #[test]
    fn test_parse_idea_list_skips_non_list_lines() {
        let content = "Here are some ideas:\n\n1. First idea\nsome commentary\n2. Second idea";
        assert_eq!(parse_idea_list(content), vec!["First idea", "Second idea"]);
    }

    #[test]
    fn test_parse_idea_list_accepts_dash_bullets() {
        assert_eq!(parse_idea_list("- One\n- Two"), vec!["One", "Two"]);
    }

    #[test]
    fn test_parse_idea_list_caps_at_ten() {
        let content = (1..=14)
            .map(|n| format!("{n}. Idea number {n}"))
            .collect::<Vec<_>>()
            .join("\n");
        let ideas = parse_idea_list(&content);
        assert_eq!(ideas.len(), MAX_IDEAS);
        assert_eq!(ideas[9], "Idea number 10");
    }

    #[test]
    fn test_parse_idea_list_drops_empty_items() {
        assert_eq!(parse_idea_list("1.\n2. Real idea\n3.   "), vec!["Real idea"]);
    }
}
