use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims};

/// Caller identity when a valid bearer token accompanies the request.
/// Handlers do not enforce authorization; this is for attribution only.
#[derive(Clone, Debug, Default)]
pub struct MaybeCaller(pub Option<Claims>);

impl MaybeCaller {
    pub fn describe(&self) -> String {
        match &self.0 {
            Some(claims) => format!("{} ({})", claims.user_id, claims.role),
            None => "anonymous".to_string(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = match extract_jwt_from_headers(&parts.headers) {
            Ok(Some(token)) => validate_jwt(&token, &state.config.security).ok(),
            _ => None,
        };
        Ok(MaybeCaller(claims))
    }
}

/// `Ok(None)` when there is no Authorization header at all.
pub fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get("authorization") else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
