//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use admin_core::{
    OrderDetail, OrderItem, PageMeta, Permission, Role, RoleRef, SalesPoint, User,
    UserWithRole,
};
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, CreateOrderRequest, CreateUserRequest, CurrentUserResponse,
    HealthResponse, LoginRequest, OrderItemRequest, RegisterRequest, RoleRequest,
    UpdateInfoRequest, UpdateOrderRequest, UpdatePasswordRequest, UpdateUserRequest,
    UploadResponse,
};

/// 관리자 API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Admin Backend API",
        version = "0.1.0",
        description = r#"
# 관리자 백엔드 REST API

사용자, 역할, 권한, 주문, 이미지를 관리하는 REST API입니다.

## 인증

`/api/login` 또는 `/api/register`가 `jwt` HttpOnly 쿠키를 발급합니다.
이후 요청은 쿠키만으로 인증됩니다.

## 권한

각 페이지(`users`, `roles`, `orders`, `images`)는 `view-*` 또는 `edit-*` 권한으로 보호됩니다.
`GET`은 `view` 또는 `edit`, 그 밖의 메서드는 `edit`이 필요합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입, 로그인, 내 정보"),
        (name = "users", description = "사용자 관리"),
        (name = "roles", description = "역할 관리 - 권한 집합"),
        (name = "permissions", description = "권한 목록"),
        (name = "orders", description = "주문 관리 - 내보내기, 매출 차트"),
        (name = "images", description = "이미지 업로드")
    ),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            PageMeta,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            UpdateInfoRequest,
            UpdatePasswordRequest,
            CurrentUserResponse,

            // ===== Users =====
            User,
            UserWithRole,
            CreateUserRequest,
            UpdateUserRequest,

            // ===== Roles / Permissions =====
            Role,
            RoleRef,
            RoleRequest,
            Permission,

            // ===== Orders =====
            OrderDetail,
            OrderItem,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderRequest,
            SalesPoint,

            // ===== Images =====
            UploadResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::ping,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::current_user,
        crate::routes::auth::logout,
        crate::routes::auth::update_info,
        crate::routes::auth::update_password,

        // ===== Users =====
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,

        // ===== Roles / Permissions =====
        crate::routes::roles::list_roles,
        crate::routes::roles::create_role,
        crate::routes::roles::get_role,
        crate::routes::roles::update_role,
        crate::routes::roles::delete_role,
        crate::routes::permissions::list_permissions,

        // ===== Orders =====
        crate::routes::orders::list_orders,
        crate::routes::orders::create_order,
        crate::routes::orders::get_order,
        crate::routes::orders::update_order,
        crate::routes::orders::delete_order,
        crate::routes::orders::export_orders,
        crate::routes::orders::sales_chart,

        // ===== Images =====
        crate::routes::images::upload_image,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Admin Backend API"));

        for tag in ["health", "auth", "users", "roles", "permissions", "orders", "images"] {
            assert!(json.contains(&format!("\"{}\"", tag)), "missing tag {}", tag);
        }

        for path in [
            "/health/ready",
            "/api/login",
            "/api/users/{id}",
            "/api/roles/{id}",
            "/api/orders/{id}",
            "/api/export",
            "/api/chart",
            "/api/upload",
        ] {
            assert!(json.contains(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("UserWithRole"));
        assert!(json.contains("OrderDetail"));
        assert!(json.contains("SalesPoint"));
    }
}
