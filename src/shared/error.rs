use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for user-triggered interactions. Every variant is local
/// to the interaction that raised it; none is fatal to the process.
///
/// A parse mismatch is not an error and never appears here - parsers return
/// `Option` and the caller picks the branch.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("You must be logged in to perform this action.")]
    AuthenticationRequired,

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::ModelUnavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_required_maps_to_401() {
        let response = ServiceError::AuthenticationRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_persistence_keeps_collaborator_message() {
        let err = ServiceError::Persistence("duplicate key".to_string());
        assert!(err.to_string().contains("duplicate key"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_model_unavailable_maps_to_bad_gateway() {
        let err = ServiceError::ModelUnavailable("connection refused".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
