// handlers/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::ApiError;
use crate::filter::{Condition, Filter};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::resources::collections::USERS;
use crate::types::Document;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Value,
}

fn text(doc: &Document, field: &str) -> String {
    doc.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Public profile returned alongside the token.
fn profile(user: &Document) -> Value {
    let mut out = Document::new();
    for field in ["userId", "name", "email", "role", "department", "initials", "mfaEnabled"] {
        if let Some(v) = user.get(field) {
            out.insert(field.to_string(), v.clone());
        }
    }
    Value::Object(out)
}

/// Exchange email + password for a bearer token.
///
/// 400 when either credential is missing, 401 for an unknown email or a wrong
/// password (indistinguishable to the caller). Records `lastLogin` on success.
pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody<LoginRequest>) -> ApiResult<LoginResponse> {
    let (email, password) = match (body.email, body.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let by_email = Filter::matching(Condition::eq("email", email.as_str()));
    let Some(user) = state.store.find_one(&USERS, &by_email).await? else {
        warn!("Login attempt for unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&password, &text(&user, "passwordHash")) {
        warn!(user_id = %text(&user, "userId"), "Login attempt with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let mut changes = Document::new();
    changes.insert(
        "lastLogin".to_string(),
        Value::String(Utc::now().format("%Y-%m-%d %H:%M").to_string()),
    );
    let user = state.store.update_one(&USERS, &by_email, changes).await?.unwrap_or(user);

    let claims = Claims::new(
        text(&user, "userId"),
        text(&user, "role"),
        text(&user, "name"),
        state.config.security.jwt_expiry_hours,
    );
    let token = generate_jwt(&claims, &state.config.security).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error(e.to_string())
    })?;

    info!(user_id = %claims.user_id, "User logged in");
    Ok(ApiResponse::success(LoginResponse { token, user: profile(&user) }))
}
