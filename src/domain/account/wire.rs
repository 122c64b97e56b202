//! Wire types for the account endpoints.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Server-issued session. The token replaces the generated device token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub account_id: String,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

/// Response of `GET /api/account/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
}
