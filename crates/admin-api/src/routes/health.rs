//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템에서 사용하는 liveness/readiness 엔드포인트입니다.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 데이터베이스 연결 상태
    pub database: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down")
    pub status: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 연결 확인용 ping.
///
/// GET /ping
#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses((status = 200, description = "pong", body = String))
)]
pub async fn ping() -> &'static str {
    "pong"
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "서버 응답 가능"))
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 데이터베이스 연결을 확인합니다.
/// GET /health/ready
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "모든 의존성 정상", body = HealthResponse),
        (status = 503, description = "데이터베이스 연결 실패", body = HealthResponse)
    )
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, status_code, database) =
        match sqlx::query("SELECT 1").execute(&state.db_pool).await {
            Ok(_) => ("healthy", StatusCode::OK, ComponentStatus::up()),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                (
                    "unhealthy",
                    StatusCode::SERVICE_UNAVAILABLE,
                    ComponentStatus::down("연결 실패"),
                )
            }
        };

    let response = HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth { database },
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
