//! Generation plans — resolves a request's type tag into everything the
//! dispatcher needs: prompts, token budget, provider, parse mode, and the
//! billing behavior. One lookup up front instead of branch-by-branch logic
//! scattered through the pipeline.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::generation::prompts;

/// Cost of the standard generation types.
pub const BASE_COST: i64 = 1;
/// Flat cost of a trend analysis, regardless of topic.
pub const TREND_COST: i64 = 5;
/// Minutes assumed when a script request carries no usable duration.
const SCRIPT_FALLBACK_MINUTES: i64 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Content type discriminator. Unknown or missing tags fall back to the
/// standard SEO mode, matching how clients have always treated the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationKind {
    #[default]
    Seo,
    Script,
    Ideas,
    Hashtags,
    Captions,
    Trends,
}

impl GenerationKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "script" => Self::Script,
            "ideas" => Self::Ideas,
            "hashtags" => Self::Hashtags,
            "captions" => Self::Captions,
            "trends" => Self::Trends,
            _ => Self::Seo,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Seo => "seo",
            Self::Script => "script",
            Self::Ideas => "ideas",
            Self::Hashtags => "hashtags",
            Self::Captions => "captions",
            Self::Trends => "trends",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for GenerationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Request body for the generation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    #[serde(rename = "type", default)]
    pub kind: GenerationKind,
    pub platform: Option<String>,
    pub duration: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Plan resolution
// ────────────────────────────────────────────────────────────────────────────

/// Which configured completion provider handles the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Primary,
    Trends,
}

/// How the model's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Fence-stripped, then parsed as a JSON document.
    Json,
    /// Raw text passed through.
    Text,
}

/// A fully resolved plan for one generation request.
///
/// `base_cost` is the generic balance check applied to every request;
/// `required_cost` is the type's real price, checked again before the
/// provider call. Both checks happen before any external call. `charge`
/// is what actually gets deducted afterwards: None for the free types.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub kind: GenerationKind,
    pub provider: Provider,
    pub parse_mode: ParseMode,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub json_response: bool,
    pub base_cost: i64,
    pub required_cost: i64,
    pub charge: Option<i64>,
    pub persists: bool,
}

impl GenerationPlan {
    pub fn resolve(request: &GenerateRequest) -> Self {
        match request.kind {
            GenerationKind::Seo => Self {
                kind: request.kind,
                provider: Provider::Primary,
                parse_mode: ParseMode::Json,
                system_prompt: prompts::SEO_SYSTEM.to_string(),
                user_prompt: request.topic.clone(),
                max_tokens: 1024,
                temperature: None,
                json_response: false,
                base_cost: BASE_COST,
                required_cost: BASE_COST,
                charge: Some(BASE_COST),
                persists: true,
            },
            GenerationKind::Script => {
                let minutes = script_minutes(request.duration.as_deref());
                Self {
                    kind: request.kind,
                    provider: Provider::Primary,
                    parse_mode: ParseMode::Text,
                    system_prompt: prompts::SCRIPT_SYSTEM_TEMPLATE
                        .replace("{duration}", &minutes.to_string()),
                    user_prompt: request.topic.clone(),
                    max_tokens: script_max_tokens(minutes),
                    temperature: None,
                    json_response: false,
                    base_cost: minutes,
                    required_cost: minutes,
                    charge: Some(minutes),
                    persists: false,
                }
            }
            GenerationKind::Ideas => Self {
                kind: request.kind,
                provider: Provider::Primary,
                parse_mode: ParseMode::Text,
                system_prompt: prompts::IDEAS_SYSTEM.to_string(),
                user_prompt: request.topic.clone(),
                max_tokens: 1024,
                temperature: None,
                json_response: false,
                base_cost: BASE_COST,
                required_cost: BASE_COST,
                charge: Some(BASE_COST),
                persists: false,
            },
            GenerationKind::Hashtags => Self {
                kind: request.kind,
                provider: Provider::Primary,
                parse_mode: ParseMode::Json,
                system_prompt: prompts::HASHTAGS_SYSTEM.to_string(),
                user_prompt: request.topic.clone(),
                max_tokens: 1024,
                temperature: None,
                json_response: false,
                base_cost: BASE_COST,
                required_cost: BASE_COST,
                charge: None,
                persists: false,
            },
            GenerationKind::Captions => {
                let platform = request
                    .platform
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .unwrap_or(prompts::DEFAULT_PLATFORM);
                Self {
                    kind: request.kind,
                    provider: Provider::Primary,
                    parse_mode: ParseMode::Json,
                    system_prompt: prompts::CAPTIONS_SYSTEM_TEMPLATE
                        .replace("{platform}", platform),
                    user_prompt: request.topic.clone(),
                    max_tokens: 1024,
                    temperature: None,
                    json_response: false,
                    base_cost: BASE_COST,
                    required_cost: BASE_COST,
                    charge: None,
                    persists: false,
                }
            }
            GenerationKind::Trends => Self {
                kind: request.kind,
                provider: Provider::Trends,
                parse_mode: ParseMode::Json,
                system_prompt: prompts::TRENDS_SYSTEM.to_string(),
                user_prompt: prompts::TRENDS_USER_TEMPLATE.replace("{topic}", &request.topic),
                max_tokens: 1024,
                temperature: Some(0.7),
                json_response: true,
                base_cost: BASE_COST,
                required_cost: TREND_COST,
                charge: Some(TREND_COST),
                persists: false,
            },
        }
    }
}

/// Parses a script duration into whole minutes. Anything that is not a
/// positive integer falls back to the default.
fn script_minutes(duration: Option<&str>) -> i64 {
    duration
        .and_then(|d| d.trim().parse::<i64>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(SCRIPT_FALLBACK_MINUTES)
}

/// Token budget for a script of the given length.
fn script_max_tokens(minutes: i64) -> u32 {
    if minutes >= 15 {
        2048
    } else if minutes >= 10 {
        1536
    } else {
        1024
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind_tag: Option<&str>) -> GenerateRequest {
        let mut body = serde_json::json!({ "topic": "rust web frameworks" });
        if let Some(tag) = kind_tag {
            body["type"] = serde_json::json!(tag);
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_kind_defaults_to_seo_when_type_omitted() {
        let req = request(None);
        assert_eq!(req.kind, GenerationKind::Seo);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_seo() {
        let req = request(Some("interpretive-dance"));
        assert_eq!(req.kind, GenerationKind::Seo);
    }

    #[test]
    fn test_known_tags_resolve() {
        assert_eq!(GenerationKind::from_tag("script"), GenerationKind::Script);
        assert_eq!(GenerationKind::from_tag("ideas"), GenerationKind::Ideas);
        assert_eq!(
            GenerationKind::from_tag("hashtags"),
            GenerationKind::Hashtags
        );
        assert_eq!(
            GenerationKind::from_tag("captions"),
            GenerationKind::Captions
        );
        assert_eq!(GenerationKind::from_tag("trends"), GenerationKind::Trends);
    }

    #[test]
    fn test_seo_plan_charges_and_persists() {
        let plan = GenerationPlan::resolve(&request(None));
        assert_eq!(plan.provider, Provider::Primary);
        assert_eq!(plan.parse_mode, ParseMode::Json);
        assert_eq!(plan.required_cost, 1);
        assert_eq!(plan.charge, Some(1));
        assert!(plan.persists);
        assert_eq!(plan.user_prompt, "rust web frameworks");
    }

    #[test]
    fn test_script_cost_follows_duration() {
        let mut req = request(Some("script"));
        req.duration = Some("10".to_string());
        let plan = GenerationPlan::resolve(&req);
        assert_eq!(plan.required_cost, 10);
        assert_eq!(plan.charge, Some(10));
        assert_eq!(plan.max_tokens, 1536);
        assert!(plan.system_prompt.contains("10-minute"));
    }

    #[test]
    fn test_script_duration_fallback_on_garbage() {
        for duration in [None, Some("soon"), Some(""), Some("0"), Some("-3")] {
            let mut req = request(Some("script"));
            req.duration = duration.map(str::to_string);
            let plan = GenerationPlan::resolve(&req);
            assert_eq!(plan.required_cost, 5, "duration {duration:?}");
            assert!(plan.system_prompt.contains("5-minute"));
        }
    }

    #[test]
    fn test_script_token_budget_scales_with_minutes() {
        assert_eq!(script_max_tokens(3), 1024);
        assert_eq!(script_max_tokens(5), 1024);
        assert_eq!(script_max_tokens(10), 1536);
        assert_eq!(script_max_tokens(15), 2048);
        assert_eq!(script_max_tokens(30), 2048);
    }

    #[test]
    fn test_trends_plan_uses_trends_provider() {
        let plan = GenerationPlan::resolve(&request(Some("trends")));
        assert_eq!(plan.provider, Provider::Trends);
        assert_eq!(plan.base_cost, 1);
        assert_eq!(plan.required_cost, 5);
        assert_eq!(plan.charge, Some(5));
        assert_eq!(plan.temperature, Some(0.7));
        assert!(plan.json_response);
        assert_eq!(
            plan.user_prompt,
            "Analyze 5 trending topics for: rust web frameworks"
        );
    }

    #[test]
    fn test_hashtags_and_captions_are_not_charged() {
        for tag in ["hashtags", "captions"] {
            let plan = GenerationPlan::resolve(&request(Some(tag)));
            assert_eq!(plan.required_cost, 1, "{tag} still requires a balance");
            assert_eq!(plan.charge, None, "{tag} must not deduct");
            assert!(!plan.persists);
        }
    }

    #[test]
    fn test_hashtags_prompt_keeps_hash_prefixed_structure() {
        let plan = GenerationPlan::resolve(&request(Some("hashtags")));
        assert!(plan.system_prompt.contains("including # symbol"));
        assert!(plan
            .system_prompt
            .contains(r##"{"hashtags":["#example1","#example2"]}"##));
        assert!(plan
            .system_prompt
            .ends_with("No markdown, no explanation, only JSON."));
    }

    #[test]
    fn test_captions_platform_interpolation() {
        let mut req = request(Some("captions"));
        req.platform = Some("TikTok".to_string());
        let plan = GenerationPlan::resolve(&req);
        assert!(plan.system_prompt.contains("TikTok copywriter"));
        assert!(plan.system_prompt.contains("optimized for TikTok"));
    }

    #[test]
    fn test_captions_platform_defaults_to_instagram() {
        for platform in [None, Some(""), Some("   ")] {
            let mut req = request(Some("captions"));
            req.platform = platform.map(str::to_string);
            let plan = GenerationPlan::resolve(&req);
            assert!(plan.system_prompt.contains("Instagram copywriter"));
        }
    }

    #[test]
    fn test_only_seo_persists_history() {
        for tag in ["script", "ideas", "hashtags", "captions", "trends"] {
            let plan = GenerationPlan::resolve(&request(Some(tag)));
            assert!(!plan.persists, "{tag} must not persist history");
        }
    }
}
