//! HTTP 요청 metrics middleware.
//!
//! 경로 라벨은 일치한 라우트 템플릿(`/api/orders/{id}`)을 사용합니다.
//! 라우트가 없는 요청은 숫자 세그먼트를 정규화한 실제 경로를 씁니다.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_in_flight, record_http_request,
    record_http_response,
};

/// 스크레이프 요청은 집계하지 않습니다.
const METRICS_PATH: &str = "/metrics";

/// 메트릭 라벨로 쓸 경로.
fn path_label(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    }
}

/// HTTP 메트릭을 수집하는 미들웨어.
///
/// - `http_requests_total`, `http_responses_total` (method, path, status)
/// - `http_request_duration_seconds`
/// - `http_requests_in_flight`
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    if request.uri().path() == METRICS_PATH {
        return next.run(request).await;
    }

    let method = request.method().as_str().to_owned();
    let path = path_label(&request);
    let start = Instant::now();

    record_http_request(&method, &path);
    record_http_in_flight(1.0);

    let response = next.run(request).await;

    record_http_in_flight(-1.0);
    record_http_response(&method, &path, response.status().as_u16());
    record_http_duration(&method, &path, start.elapsed().as_secs_f64());

    response
}
