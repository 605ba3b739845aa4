//! 역할 관리 API 라우트
//!
//! 모든 엔드포인트는 `roles` 페이지 권한이 필요합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/roles` - 전체 역할 (권한 포함)
//! - `POST /api/roles` - 역할 생성
//! - `GET /api/roles/{id}` - 역할 조회
//! - `PUT /api/roles/{id}` - 이름과 권한 집합 교체
//! - `DELETE /api/roles/{id}` - 역할 삭제

use admin_core::{AdminError, Role};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{Authorized, RolesPage};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::repository::RoleRepository;
use crate::state::AppState;

/// 역할 생성/수정 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// 부여할 권한 ID 목록
    #[serde(default)]
    pub permissions: Vec<i64>,
}

/// 전체 역할.
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "roles",
    responses(
        (status = 200, description = "역할 목록", body = Vec<Role>),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn list_roles(
    _auth: Authorized<RolesPage>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Role>>> {
    Ok(Json(RoleRepository::list(&state.db_pool).await?))
}

/// 역할 생성.
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "생성된 역할", body = Role),
        (status = 400, description = "존재하지 않는 권한 ID", body = ApiErrorResponse)
    )
)]
pub async fn create_role(
    Authorized(actor, _): Authorized<RolesPage>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RoleRequest>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let role = RoleRepository::create(&state.db_pool, &req.name, &req.permissions).await?;

    info!(actor = actor.user_id, role_id = role.id, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}

/// 역할 조회.
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "역할 ID")),
    responses(
        (status = 200, description = "역할", body = Role),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_role(
    _auth: Authorized<RolesPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Role>> {
    let role = RoleRepository::find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AdminError::not_found("role", id))?;
    Ok(Json(role))
}

/// 역할 수정.
///
/// 기존 권한 연결을 모두 지우고 요청한 권한으로 교체합니다.
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "역할 ID")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "수정된 역할", body = Role),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn update_role(
    Authorized(actor, _): Authorized<RolesPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<RoleRequest>,
) -> ApiResult<Json<Role>> {
    let role = RoleRepository::update(&state.db_pool, id, &req.name, &req.permissions)
        .await?
        .ok_or_else(|| AdminError::not_found("role", id))?;

    info!(
        actor = actor.user_id,
        role_id = id,
        permissions = role.permissions.len(),
        "Role updated"
    );
    Ok(Json(role))
}

/// 역할 삭제.
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "역할 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 400, description = "사용 중인 역할", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_role(
    Authorized(actor, _): Authorized<RolesPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !RoleRepository::delete(&state.db_pool, id).await? {
        return Err(AdminError::not_found("role", id).into());
    }

    info!(actor = actor.user_id, role_id = id, "Role deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 역할 라우터 생성 (`/api` 아래에 병합).
pub fn roles_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/roles", get(list_roles).post(create_role))
        .route(
            "/roles/{id}",
            get(get_role).put(update_role).delete(delete_role),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_request_requires_name() {
        let req: RoleRequest = serde_json::from_str(r#"{"name":"","permissions":[1]}"#).unwrap();
        assert!(req.validate().is_err());

        let req: RoleRequest = serde_json::from_str(r#"{"name":"Auditor","permissions":[1,3]}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.permissions, vec![1, 3]);
    }

    #[test]
    fn test_role_request_permissions_default_to_empty() {
        let req: RoleRequest = serde_json::from_str(r#"{"name":"Guest"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.permissions.is_empty());
    }
}
