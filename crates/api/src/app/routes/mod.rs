use axum::{Router, routing::get};

use crate::app::services::AppServices;

pub mod resource;
pub mod system;

/// Router for every resource endpoint (behind the auth middleware).
pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route("/api/currentUser", get(system::current_user))
        .merge(resource::router(services.help_requests.clone()))
        .merge(resource::router(services.recommendation_requests.clone()))
        .merge(resource::router(services.organizations.clone()))
        .merge(resource::router(services.menu_items.clone()))
}
