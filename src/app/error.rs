use crate::utils::error::TradeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl TradeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TradeError::NotFound { .. } => StatusCode::NOT_FOUND,
            TradeError::Validation { .. } => StatusCode::BAD_REQUEST,
            TradeError::Conflict { .. } => StatusCode::CONFLICT,
            TradeError::AuthenticationFailed | TradeError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            TradeError::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            TradeError::NotFound { .. } => "NOT_FOUND",
            TradeError::Validation { .. } => "INVALID_REQUEST",
            TradeError::Conflict { .. } => "CONFLICT",
            TradeError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            TradeError::NotAuthenticated => "NOT_AUTHENTICATED",
            TradeError::PermissionDenied => "PERMISSION_DENIED",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for TradeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(
                "❌ Internal error: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
            self.user_friendly_message()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };

        let mut error = json!({ "code": self.code(), "message": message });
        if let TradeError::Validation { field, .. } = &self {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TradeError::not_found("node", "Ghost").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TradeError::validation("name", "blank").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(TradeError::conflict("dup").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            TradeError::NotAuthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TradeError::PermissionDenied.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TradeError::IoError(std::io::Error::other("disk")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
