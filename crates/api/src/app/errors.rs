use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campusdesk_core::DomainError;
use campusdesk_infra::EndpointError;

pub fn endpoint_error_to_response(err: EndpointError) -> axum::response::Response {
    match err {
        EndpointError::Forbidden(_) => forbidden(),
        EndpointError::Domain(e @ DomainError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, "EntityNotFoundException", e.to_string())
        }
        EndpointError::Domain(e @ DomainError::InvalidId(_)) => bad_request(e.to_string()),
        // Store details are logged by the endpoint, never returned.
        EndpointError::Internal(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            "internal server error",
        ),
    }
}

pub fn forbidden() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "AccessDeniedException", "Access Denied")
}

pub fn bad_request(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "BadRequest", message)
}

pub fn json_error(
    status: StatusCode,
    kind: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "type": kind,
            "message": message.into(),
        })),
    )
        .into_response()
}
