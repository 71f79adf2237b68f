// Credit-gated generation engine.
// Implements: plan resolution, prompt templates, dispatch, output shaping.
// All provider calls go through llm_client — no direct HTTP calls here.

pub mod dispatcher;
pub mod handlers;
pub mod output;
pub mod plan;
pub mod prompts;
