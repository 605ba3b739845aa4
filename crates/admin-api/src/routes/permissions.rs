//! 권한 목록 API 라우트
//!
//! - `GET /api/permissions` - 전체 권한 (인증만 필요)

use admin_core::Permission;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::auth::Authenticated;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::PermissionRepository;
use crate::state::AppState;

/// 전체 권한.
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "permissions",
    responses(
        (status = 200, description = "권한 목록", body = Vec<Permission>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    )
)]
pub async fn list_permissions(
    _auth: Authenticated,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Permission>>> {
    Ok(Json(PermissionRepository::list(&state.db_pool).await?))
}

/// 권한 라우터 생성 (`/api` 아래에 병합).
pub fn permissions_router() -> Router<Arc<AppState>> {
    Router::new().route("/permissions", get(list_permissions))
}
