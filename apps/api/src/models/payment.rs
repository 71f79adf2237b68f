#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gmail: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Pending request joined with the payer's email for the admin review queue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingPaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub gmail: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
