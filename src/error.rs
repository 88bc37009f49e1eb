// HTTP API error types.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Terminal request failures with client-facing status codes and messages.
///
/// Every failure carries the context label of the operation that produced
/// it ("get"/"create"/"update"/"delete") except the two fixed-message
/// authorization outcomes, which are deliberately uniform.
#[derive(Debug)]
pub enum ApiError {
    // 403 Forbidden: the access decision returned deny.
    PermissionDenied,

    // 401 Unauthorized: no caller identity where one is required.
    LoginRequired,

    // 400 Bad Request: malformed identifier or request body.
    Validation { context: &'static str, message: String },

    // 500 Internal Server Error: opaque persistence failure.
    Persistence { context: &'static str, message: String },
}

impl ApiError {
    pub fn validation(context: &'static str, err: impl ToString) -> Self {
        ApiError::Validation { context, message: err.to_string() }
    }

    pub fn persistence(context: &'static str, err: impl ToString) -> Self {
        ApiError::Persistence { context, message: err.to_string() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::LoginRequired => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::PermissionDenied => "PERMISSION_DENIED",
            ApiError::LoginRequired => "LOGIN_REQUIRED",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }

    /// Client-safe error message, prefixed with the operation label where
    /// one exists.
    pub fn message(&self) -> String {
        match self {
            ApiError::PermissionDenied => "Permission Denied".to_string(),
            ApiError::LoginRequired => "login required".to_string(),
            ApiError::Validation { context, message }
            | ApiError::Persistence { context, message } => {
                format!("{}: {}", context, message)
            }
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code(),
        })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for axum.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Persistence { context, message } = &self {
            tracing::error!("persistence failure during {}: {}", context, message);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::LoginRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::validation("update", "bad id").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::persistence("delete", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn labeled_errors_carry_the_operation_context() {
        let err = ApiError::validation("update", "invalid digit found in string");
        assert_eq!(err.message(), "update: invalid digit found in string");
        assert_eq!(err.to_json()["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn denial_message_is_fixed() {
        assert_eq!(ApiError::PermissionDenied.message(), "Permission Denied");
    }
}
