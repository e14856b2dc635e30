use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use campusdesk_auth::JwtValidator;

use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Attach the caller's [`PrincipalContext`] when a valid bearer token is present.
///
/// Requests without an `Authorization` header continue anonymously and are
/// refused by the access guard. A header that is present but invalid is
/// rejected here with `401`.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = match extract_bearer(req.headers())? {
        Some(token) => Some(state.jwt.validate(token, Utc::now()).map_err(|e| {
            tracing::debug!(reason = %e, "rejected bearer token");
            StatusCode::UNAUTHORIZED
        })?),
        None => None,
    };

    if let Some(claims) = claims {
        req.extensions_mut()
            .insert(PrincipalContext::new(claims.sub, claims.roles.into()));
    }

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, StatusCode> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Some(token))
}
