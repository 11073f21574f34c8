// handlers/auth/me.rs - GET /api/auth/me handler

use axum::{extract::State, http::HeaderMap};

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::filter::{Condition, Filter};
use crate::middleware::{auth::extract_jwt_from_headers, ApiResponse, ApiResult};
use crate::resources::collections::USERS;
use crate::types::Document;

/// Verify the bearer token and return the caller's profile without `passwordHash`.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Document> {
    let token = match extract_jwt_from_headers(&headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Err(ApiError::unauthorized("No token provided")),
        Err(_) => return Err(ApiError::unauthorized("Invalid or expired token")),
    };

    let claims = validate_jwt(&token, &state.config.security).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let filter = Filter::matching(Condition::eq("userId", claims.user_id));
    let mut user = state
        .store
        .find_one(&USERS, &filter)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    user.remove("passwordHash");
    Ok(ApiResponse::success(user))
}
