//! Generation dispatch — orchestrates one credit-gated generation request.
//!
//! Flow: load balance → credit checks → provider call → parse/shape output →
//!       settle deduction → persist history (SEO only) → respond.
//!
//! Both credit checks run before the provider call. The deduction runs after
//! the call succeeds; a deduction or history write that fails is logged and
//! swallowed so the caller still receives the content they paid for.

use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::credits::{fetch_credits, settle_deduction};
use crate::errors::AppError;
use crate::generation::output::{attach_credits, parse_idea_list, parse_structured, SeoContent};
use crate::generation::plan::{
    GenerateRequest, GenerationKind, GenerationPlan, ParseMode, Provider,
};
use crate::llm_client::{ChatParams, LlmClient};

/// Runs the full dispatch pipeline for one authenticated generation request.
pub async fn dispatch(
    pool: &PgPool,
    primary: &LlmClient,
    trends: &LlmClient,
    user_id: Uuid,
    request: GenerateRequest,
) -> Result<Value, AppError> {
    // Step 1: Resolve the plan from the type tag
    let plan = GenerationPlan::resolve(&request);
    info!("Generation request: kind={} user={}", plan.kind, user_id);

    // Step 2: Load balance and run both credit checks. The generic check
    // uses the base cost; the type's real price is checked right after, so
    // no provider call is ever issued on an insufficient balance.
    let balance = fetch_credits(pool, user_id).await?;
    if balance < plan.base_cost || balance < plan.required_cost {
        return Err(AppError::InsufficientCredits);
    }

    // Step 3: Provider call
    let client = match plan.provider {
        Provider::Primary => primary,
        Provider::Trends => trends,
    };
    let content = client
        .chat(ChatParams {
            system: &plan.system_prompt,
            user: &plan.user_prompt,
            max_tokens: plan.max_tokens,
            temperature: plan.temperature,
            json_response: plan.json_response,
        })
        .await?;

    // Step 4: Interpret the response per the plan's parse mode. Structured
    // types fail here, before any credit is touched.
    let payload = match plan.parse_mode {
        ParseMode::Json => parse_structured(&content)?,
        ParseMode::Text => Value::String(content),
    };

    // Step 5: Shape the output, settle credits, persist where the plan says so
    match plan.kind {
        // Free types: the parsed payload passes through and the balance is
        // left untouched. No creditsRemaining in the response.
        GenerationKind::Hashtags | GenerationKind::Captions => Ok(payload),

        GenerationKind::Script => {
            let remaining = settle(pool, user_id, balance, &plan).await;
            Ok(json!({ "description": payload, "creditsRemaining": remaining }))
        }

        GenerationKind::Ideas => {
            let ideas = parse_idea_list(payload.as_str().unwrap_or_default());
            let remaining = settle(pool, user_id, balance, &plan).await;
            Ok(json!({ "ideas": ideas, "creditsRemaining": remaining }))
        }

        GenerationKind::Trends => {
            // Shape check must precede settlement: never bill for a
            // response the client cannot render
            if !payload.is_object() {
                return Err(AppError::MalformedAiResponse(
                    "expected a JSON object at the top level".to_string(),
                ));
            }
            let remaining = settle(pool, user_id, balance, &plan).await;
            attach_credits(payload, remaining)
        }

        GenerationKind::Seo => {
            let seo = SeoContent::from_value(payload)?;
            let remaining = settle(pool, user_id, balance, &plan).await;
            if plan.persists {
                save_generation(pool, user_id, &request.topic, &seo).await;
            }

            let body = serde_json::to_value(&seo).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to serialize SEO content: {e}"))
            })?;
            attach_credits(body, remaining)
        }
    }
}

/// Applies the plan's charge and reports the remaining balance. Plans that
/// never charge report the balance unchanged.
async fn settle(pool: &PgPool, user_id: Uuid, balance: i64, plan: &GenerationPlan) -> i64 {
    match plan.charge {
        Some(cost) => settle_deduction(pool, user_id, balance, cost).await,
        None => balance,
    }
}

/// Writes the SEO history row. Failures are logged and swallowed — the
/// caller already has their content at this point.
async fn save_generation(pool: &PgPool, user_id: Uuid, topic: &str, seo: &SeoContent) {
    let result = sqlx::query(
        r#"
        INSERT INTO generations
            (user_id, topic, title, description, tags, keywords, meta_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user_id)
    .bind(topic)
    .bind(&seo.title)
    .bind(&seo.description)
    .bind(&seo.tags)
    .bind(&seo.keywords)
    .bind(&seo.meta_description)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!("Failed to save generation for user {}: {}", user_id, e);
    }
}
