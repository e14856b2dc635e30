//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository and endpoint wiring per resource type
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tower::ServiceBuilder;

use campusdesk_auth::{Hs256JwtValidator, JwtValidator};

use crate::config::AppConfig;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = match &config.database_url {
        Some(url) => services::AppServices::postgres(url, config.database_max_connections)
            .await
            .context("failed to initialize Postgres repositories")?,
        None => services::AppServices::in_memory(),
    };

    Ok(build_router(&services, &config.jwt_secret))
}

/// Router over already-built services.
pub fn build_router(services: &services::AppServices, jwt_secret: &str) -> Router {
    let jwt: Arc<dyn JwtValidator> = Arc::new(Hs256JwtValidator::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Resource routes: caller roles come from the bearer token (if any).
    let api = routes::router(services).layer(
        ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        )),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
}
