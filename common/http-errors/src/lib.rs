use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Service-level errors and their HTTP translation.
///
/// Every failure is terminal for the request; the body carries a stable
/// machine-readable code (duplicated in the X-Error-Code header) plus an
/// optional human-readable message.
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated { message: Option<String> },
    NotFound { code: &'static str, message: Option<String> },
    Conflict { code: &'static str, message: Option<String> },
    Validation { code: &'static str, message: Option<String> },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated { message: None }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound { code, message: Some(message.into()) }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict { code, message: Some(message.into()) }
    }

    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { code, message: Some(message.into()) }
    }

    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal { message: Some(e.to_string()) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, error_code) = match self {
            ApiError::Unauthenticated { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { code: "unauthenticated".into(), message },
                "unauthenticated",
            ),
            ApiError::NotFound { code, message } => (
                StatusCode::NOT_FOUND,
                ErrorBody { code: code.into(), message },
                code,
            ),
            ApiError::Conflict { code, message } => (
                StatusCode::CONFLICT,
                ErrorBody { code: code.into(), message },
                code,
            ),
            ApiError::Validation { code, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { code: code.into(), message },
                code,
            ),
            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { code: "internal_error".into(), message },
                "internal_error",
            ),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code(resp: &Response) -> &str {
        resp.headers()
            .get("X-Error-Code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    #[test]
    fn unauthenticated_is_401() {
        let resp = ApiError::unauthenticated().into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&resp), "unauthenticated");
    }

    #[test]
    fn not_found_carries_code() {
        let resp = ApiError::not_found("order_not_found", "Order not found.").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(&resp), "order_not_found");
    }

    #[test]
    fn conflict_is_409() {
        let resp = ApiError::conflict("email_taken", "taken").into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_is_400() {
        let resp = ApiError::validation("validation", "name too short").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_is_500() {
        let resp = ApiError::internal("db gone").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_code(&resp), "internal_error");
    }
}
