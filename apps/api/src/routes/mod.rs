pub mod health;
pub mod profile;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::generation::handlers as generation;
use crate::payments::handlers as payments;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/generate", post(generation::handle_generate))
        .route(
            "/api/v1/generations",
            get(generation::handle_list_generations),
        )
        .route("/api/v1/profile", get(profile::profile_handler))
        // Payments
        .route("/api/v1/payments", post(payments::handle_create_payment))
        // Admin API
        .route("/api/v1/admin/actions", post(admin::handle_admin_action))
        .route("/api/v1/admin/stats", get(admin::handle_admin_stats))
        .route("/api/v1/admin/users", get(admin::handle_admin_users))
        .route(
            "/api/v1/admin/generations",
            get(admin::handle_admin_generations),
        )
        .route(
            "/api/v1/admin/payments",
            get(admin::handle_admin_payments),
        )
        .route(
            "/api/v1/admin/payments/:id/approve",
            post(admin::handle_approve_payment),
        )
        .route(
            "/api/v1/admin/payments/:id/reject",
            post(admin::handle_reject_payment),
        )
        .route(
            "/api/v1/admin/users/:id/credits",
            patch(admin::handle_set_credits),
        )
        .with_state(state)
}
