#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenerationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Generation joined with the owner's email for the admin dashboard.
/// Email is optional because the profile may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminGenerationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub topic: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}
