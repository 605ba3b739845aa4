//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 권한 판정 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use admin_core::{Action, Resource};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

/// 처리 중인 요청 수 증감.
pub fn record_http_in_flight(delta: f64) {
    gauge!("http_requests_in_flight").increment(delta);
}

// ============================================================================
// 인증/권한 메트릭 헬퍼 함수
// ============================================================================

/// 권한 판정 결과 기록.
///
/// `outcome`은 `allowed`, `denied`, `unauthenticated` 중 하나입니다.
pub fn record_authz_decision(resource: Resource, action: Action, outcome: &'static str) {
    counter!(
        "authz_decisions_total",
        "resource" => resource.as_str(),
        "action" => action.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// 로그인 시도 기록.
pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("auth_logins_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 숫자 ID 세그먼트를 정규화합니다.
///
/// 예: `/api/orders/42` → `/api/orders/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
