use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Identity and roles of the authenticated caller.
pub async fn current_user(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    let Some(Extension(principal)) = principal else {
        return errors::forbidden();
    };

    Json(serde_json::json!({
        "principalId": principal.principal_id().to_string(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
    .into_response()
}
