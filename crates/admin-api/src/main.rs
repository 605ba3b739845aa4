//! 관리자 백엔드 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 사용자, 역할, 주문, 이미지 관리 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use admin_core::{init_logging, AppConfig};
use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use admin_api::metrics::setup_metrics_recorder;
use admin_api::middleware::metrics_layer;
use admin_api::openapi::swagger_ui_router;
use admin_api::routes::create_api_router;
use admin_api::state::AppState;

/// 데이터베이스 연결.
///
/// 스키마(`db/schema.sql`)는 운영자가 미리 적용해 둔 것으로 가정합니다.
async fn connect_database(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    info!(
        max_connections = config.database.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// CORS 미들웨어 구성.
///
/// 토큰이 쿠키로 전달되므로 `CORS_ORIGINS`가 설정된 경우에만 자격 증명을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://admin.example.com,http://localhost:4200`
fn cors_layer() -> CorsLayer {
    let origins: Vec<_> = std::env::var("CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        warn!("CORS_ORIGINS not set, allowing any origin without credentials (development mode)");
        layer.allow_origin(AllowOrigin::any())
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let api_router = create_api_router(state.uploads.dir()).with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(swagger_ui_router())
        .merge(api_router)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use admin_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if !(export_flag || export_env) {
        return Ok(false);
    }

    println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;

    config.validate().context("Invalid configuration")?;

    info!("Starting Admin API server...");

    let metrics_handle = setup_metrics_recorder().context("Failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    let pool = connect_database(&config).await?;
    let state = Arc::new(AppState::new(pool, &config));

    info!(
        version = %state.version,
        upload_dir = %state.uploads.dir().display(),
        export_path = %state.export_path.display(),
        "Application state initialized"
    );

    let app = create_router(state.clone(), metrics_handle);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown initiated, closing database pool...");
    state.db_pool.close().await;
    info!(uptime_secs = state.uptime_secs(), "Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
