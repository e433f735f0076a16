use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use ts_rs::TS;
use welfare_core::AppError;

/// Error body returned by every access endpoint.
///
/// `code` is stable for clients to branch on; `message` is for humans and
/// names the missing permission on `forbidden`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    code: &'static str,
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self.0 {
            // Store and database details stay in the logs.
            AppError::Internal(detail) => {
                tracing::error!(error = detail.as_str(), "internal api error");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { code, message })).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use welfare_core::AppError;

    use super::{ApiError, ErrorResponse};

    #[test]
    fn forbidden_carries_code_and_missing_permission() {
        let error = ApiError(AppError::Forbidden(
            "subject 'bob' is missing permission 'users.manageRoles'".to_owned(),
        ));
        let (status, code) = error.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);

        let body = ErrorResponse {
            code,
            message: error.0.to_string(),
        };
        let value = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(value["code"], serde_json::json!("forbidden"));
        assert!(
            value["message"]
                .as_str()
                .is_some_and(|message| message.contains("users.manageRoles"))
        );
    }

    #[test]
    fn missing_identity_maps_to_unauthorized() {
        let response =
            ApiError(AppError::Unauthorized("authentication required".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_map_to_server_error() {
        let response =
            ApiError(AppError::Internal("connection refused".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
