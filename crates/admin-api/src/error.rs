//! API 에러 응답.
//!
//! 모든 엔드포인트에서 같은 JSON 형식으로 에러를 반환합니다.
//!
//! ```json
//! {
//!   "code": "UNAUTHORIZED",
//!   "message": "권한이 없습니다",
//!   "timestamp": 1738300800
//! }
//! ```
//!
//! 서버 측 에러(데이터베이스, 내부)는 상세 내용을 로그에만 남기고 일반 메시지로 응답합니다.

use admin_core::AdminError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::{PasswordError, TokenError};

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHENTICATED", "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (필드별 검증 실패 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// 요청 메서드 (라우트 미일치 응답에 포함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로 (라우트 미일치 응답에 포함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 요청 메서드와 경로 추가.
    #[must_use]
    pub fn with_request(mut self, method: impl Into<String>, path: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.path = Some(path.into());
        self
    }

    /// 상세 정보 추가.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러 에러.
///
/// `AdminError`를 감싸 HTTP 상태 코드와 응답 본문으로 변환합니다.
#[derive(Debug)]
pub struct ApiError {
    error: AdminError,
    details: Option<Value>,
}

impl ApiError {
    pub fn new(error: AdminError) -> Self {
        Self {
            error,
            details: None,
        }
    }

    pub fn inner(&self) -> &AdminError {
        &self.error
    }

    /// 상태 코드와 에러 코드.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.error {
            AdminError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            AdminError::Unauthorized => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            AdminError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AdminError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AdminError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AdminError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
            AdminError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(error: AdminError) -> Self {
        Self::new(error)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        Self::new(AdminError::from(error))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self {
            error: AdminError::Validation("invalid request body".to_string()),
            details: serde_json::to_value(&errors).ok(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        Self::new(AdminError::from(error))
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        Self::new(AdminError::from(error))
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Encoding(e) => Self::new(AdminError::Internal(format!("token: {}", e))),
            TokenError::Expired | TokenError::Invalid => Self::new(AdminError::Unauthenticated),
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(error: csv::Error) -> Self {
        Self::new(AdminError::Internal(format!("csv: {}", error)))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.error.is_client_error() {
            self.error.to_string()
        } else {
            tracing::error!(error = %self.error, "Request failed");
            "요청을 처리하지 못했습니다".to_string()
        };

        let mut body = ApiErrorResponse::new(code, message);
        if let Some(details) = self.details {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
