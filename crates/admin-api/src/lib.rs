//! 관리자 백엔드 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - 쿠키 기반 JWT 인증과 페이지 단위 권한 판정
//! - 주문 CSV 내보내기, 이미지 업로드
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰, 쿠키, 비밀번호, 권한 판정
//! - [`repository`]: PostgreSQL 접근
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod export;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;
pub mod storage;

pub use auth::{
    authorize, hash_password, verify_password, AccessStore, Authenticated, Authorized, Claims,
    Principal, TokenConfig,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;

/// 테스트 토큰 서명 키.
#[cfg(test)]
pub(crate) const TEST_JWT_SECRET: &str = "test-secret-key-for-unit-tests-only-0123456789";
