//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/ping` - 연결 확인
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/register`, `/api/login`, `/api/logout`, `/api/user` - 인증
//! - `/api/users` - 사용자 관리 (`users` 페이지)
//! - `/api/roles` - 역할 관리 (`roles` 페이지)
//! - `/api/permissions` - 권한 목록
//! - `/api/orders`, `/api/export`, `/api/chart` - 주문 (`orders` 페이지)
//! - `/api/upload`, `/api/uploads` - 이미지 (`images` 페이지)

pub mod auth;
pub mod health;
pub mod images;
pub mod orders;
pub mod permissions;
pub mod roles;
pub mod users;

pub use auth::{
    auth_router, CurrentUserResponse, LoginRequest, RegisterRequest, UpdateInfoRequest,
    UpdatePasswordRequest,
};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use images::{images_router, UploadResponse};
pub use orders::{
    orders_router, CreateOrderRequest, OrderItemRequest, UpdateOrderRequest,
};
pub use permissions::permissions_router;
pub use roles::{roles_router, RoleRequest};
pub use users::{users_router, CreateUserRequest, UpdateUserRequest};

use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// 업로드 파일은 `upload_dir`에서 읽기 전용으로 제공됩니다.
pub fn create_api_router(upload_dir: &Path) -> Router<Arc<AppState>> {
    let api = Router::new()
        .merge(auth_router())
        .merge(users_router())
        .merge(roles_router())
        .merge(permissions_router())
        .merge(orders_router())
        .merge(images_router(upload_dir));

    Router::new()
        .route("/ping", get(health::ping))
        .nest("/health", health_router())
        .nest("/api", api)
        .fallback(not_found)
}

/// 일치하는 라우트가 없을 때의 응답.
async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(
            ApiErrorResponse::new("NOT_FOUND", "경로를 찾을 수 없습니다")
                .with_request(method.as_str(), uri.path()),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryAccessStore;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Request},
        response::Response,
    };
    use tower::ServiceExt;

    const ADMIN: i64 = 1;
    const EDITOR: i64 = 2;
    const VIEWER: i64 = 3;
    const ROLE_AUDITOR: i64 = 4;

    fn app() -> (Router, AppState) {
        let store = MemoryAccessStore::default()
            .with_user(
                ADMIN,
                "Admin",
                &["edit-users", "edit-roles", "edit-orders", "edit-images"],
            )
            .with_user(EDITOR, "Editor", &["edit-orders"])
            .with_user(VIEWER, "Viewer", &["view-users"])
            .with_user(ROLE_AUDITOR, "Auditor", &["view-roles"]);
        let state = create_test_state(Arc::new(store));
        let router = create_api_router(state.uploads.dir()).with_state(Arc::new(state.clone()));
        (router, state)
    }

    fn cookie_for(state: &AppState, user_id: i64) -> String {
        format!("jwt={}", state.tokens.issue(user_id).unwrap())
    }

    async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    async fn error_code(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        body.code
    }

    #[tokio::test]
    async fn test_ping() {
        let (router, _) = app();
        let response = send(
            router,
            Request::builder().uri("/ping").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn test_missing_cookie_is_401() {
        let (router, _) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_401() {
        let (router, state) = app();
        let mut cookie = cookie_for(&state, ADMIN);
        cookie.push_str("tampered");

        let response = send(
            router,
            Request::builder()
                .uri("/api/orders")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_editor_cannot_delete_users() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/users/1")
                .header(header::COOKIE, cookie_for(&state, EDITOR))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(response).await, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_view_permission_cannot_write() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .method(Method::PUT)
                .uri("/api/users/5")
                .header(header::COOKIE, cookie_for(&state, VIEWER))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"firstname":"X"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_view_roles_cannot_change_roles() {
        let (router, state) = app();
        let cookie = cookie_for(&state, ROLE_AUDITOR);

        for (method, uri) in [
            (Method::POST, "/api/roles"),
            (Method::PUT, "/api/roles/2"),
            (Method::DELETE, "/api/roles/2"),
        ] {
            let response = send(
                router.clone(),
                Request::builder()
                    .method(method.clone())
                    .uri(uri)
                    .header(header::COOKIE, cookie.clone())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Auditor","permissions":[2]}"#))
                    .unwrap(),
            )
            .await;

            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
            assert_eq!(error_code(response).await, "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_roles_page_requires_roles_permission() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/roles")
                .header(header::COOKIE, cookie_for(&state, VIEWER))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_with_empty_name_is_400() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/roles")
                .header(header::COOKIE, cookie_for(&state, ADMIN))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"","permissions":[1]}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_self_service_routes_require_token() {
        let (router, _) = app();

        for (method, uri, body) in [
            (Method::GET, "/api/user", ""),
            (Method::PUT, "/api/users/info", r#"{"firstname":"Ada"}"#),
            (
                Method::PUT,
                "/api/users/password",
                r#"{"password":"a","password_confirm":"a"}"#,
            ),
        ] {
            let response = send(
                router.clone(),
                Request::builder()
                    .method(method.clone())
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await;

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(error_code(response).await, "UNAUTHENTICATED");
        }
    }

    #[tokio::test]
    async fn test_chart_requires_orders_permission() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/chart")
                .header(header::COOKIE, cookie_for(&state, VIEWER))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_numeric_page_is_400() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/users?page=abc")
                .header(header::COOKIE, cookie_for(&state, ADMIN))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_password_mismatch_is_400() {
        let (router, _) = app();
        let body = r#"{"firstname":"Ada","lastname":"Lovelace","email":"ada@example.com",
            "phone_no":"","password":"one","password_confirm":"two"}"#;

        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_without_token() {
        let (router, _) = app();
        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with("jwt="));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_upload_requires_images_permission() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/upload")
                .header(header::COOKIE, cookie_for(&state, EDITOR))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_stores_file_and_returns_url() {
        let (router, state) = app();
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"../router-test.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = boundary
        );

        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/upload")
                .header(header::COOKIE, cookie_for(&state, ADMIN))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let upload: UploadResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(upload.url.ends_with("/router-test.png"));

        let stored = state.uploads.dir().join("router-test.png");
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"PNGDATA");
        tokio::fs::remove_file(&stored).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_with_bad_second_name_stores_nothing() {
        let (router, state) = app();
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"kept-out.png\"\r\n\
             Content-Type: image/png\r\n\r\nFIRST\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"..\"\r\n\
             Content-Type: image/png\r\n\r\nSECOND\r\n--{b}--\r\n",
            b = boundary
        );

        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/upload")
                .header(header::COOKIE, cookie_for(&state, ADMIN))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!state.uploads.dir().join("kept-out.png").exists());
    }

    #[tokio::test]
    async fn test_empty_page_value_lists_first_page() {
        let (router, state) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/users?page=")
                .header(header::COOKIE, cookie_for(&state, VIEWER))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_ne!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (router, _) = app();
        let response = send(
            router,
            Request::builder()
                .uri("/api/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.path.as_deref(), Some("/api/nothing-here"));
        assert_eq!(body.method.as_deref(), Some("GET"));
    }
}
