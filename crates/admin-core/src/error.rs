//! 관리자 백엔드의 에러 타입.
//!
//! 인증, 권한, 입력 검증, 저장소 에러를 하나의 분류로 정의합니다.
//! HTTP 상태 코드로의 변환은 API 계층이 담당합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum AdminError {
    /// 토큰 누락, 위조, 만료 또는 삭제된 사용자
    #[error("인증되지 않았습니다")]
    Unauthenticated,

    /// 인증은 되었으나 페이지 권한 부족
    #[error("권한이 없습니다")]
    Unauthorized,

    /// 잘못된 입력 (예: 비밀번호 확인 불일치)
    #[error("잘못된 입력: {0}")]
    Validation(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 (예: 이미 등록된 이메일)
    #[error("중복: {0}")]
    Conflict(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 내부 에러 (해싱 실패, 파일 시스템 등)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl AdminError {
    /// 클라이언트 요청에서 비롯된 에러인지 확인합니다.
    ///
    /// 서버 측 에러는 상세 내용을 응답에 노출하지 않습니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AdminError::Database(_) | AdminError::Internal(_))
    }

    /// 대상 이름을 포함한 NotFound 에러 생성.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AdminError::NotFound(format!("{} {}", entity, id))
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Internal(err.to_string())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AdminError::NotFound("레코드".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AdminError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AdminError::Validation(db.message().to_string())
            }
            _ => AdminError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(AdminError::Unauthenticated.is_client_error());
        assert!(AdminError::Validation("x".into()).is_client_error());
        assert!(!AdminError::Database("down".into()).is_client_error());
        assert!(!AdminError::Internal("hash".into()).is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = AdminError::not_found("order", 42);
        assert_eq!(err.to_string(), "찾을 수 없음: order 42");
    }
}
