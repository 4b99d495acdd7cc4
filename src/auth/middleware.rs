// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::auth::token::{Claims, TokenService};
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Gate a request on a fresh bearer token
///
/// Rejections, in order of the checks:
/// - no (or empty) `Authorization` header: `TokenNotFound`
/// - nothing after the `Bearer ` prefix: `TokenNotFound`
/// - bad signature, algorithm or structure: `InvalidToken`
/// - well-formed but past `exp`: `TokenExpired`
///
/// On success the claims are attached to the request extensions.
pub async fn require_auth(
    State(token_service): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&token_service, request.headers().get(header::AUTHORIZATION))?;

    debug!(
        "Authenticated user_id={}, endpoint={}",
        claims.id,
        request.uri().path()
    );

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn authenticate(
    token_service: &TokenService,
    header_value: Option<&header::HeaderValue>,
) -> Result<Claims, ApiError> {
    let auth_header = match header_value {
        Some(value) if !value.is_empty() => value
            .to_str()
            .map_err(|_| ApiError::InvalidToken("invalid token: malformed Authorization header".to_string()))?,
        _ => {
            return Err(ApiError::TokenNotFound(
                "missing Authorization header".to_string(),
            ))
        }
    };

    // A header without the prefix is treated as the raw token
    let token = match auth_header.trim_end() {
        "Bearer" => "",
        value => value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim(),
    };
    if token.is_empty() {
        return Err(ApiError::TokenNotFound(
            "missing token in Authorization header".to_string(),
        ));
    }

    let claims = token_service.validate_and_parse(token)?;
    if claims.is_expired_at(Utc::now()) {
        return Err(ApiError::TokenExpired("token is expired".to_string()));
    }

    Ok(claims)
}

/// Authenticated user extractor for protected routes
///
/// Reads the claims `require_auth` attached; a route that is not behind
/// the middleware rejects with `Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthenticatedUser {
            user_id: claims.id.clone(),
            email: claims.email.clone(),
        })
    }
}
