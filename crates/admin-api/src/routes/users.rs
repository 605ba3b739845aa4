//! 사용자 관리 API 라우트
//!
//! 모든 엔드포인트는 `users` 페이지 권한이 필요합니다.
//! 조회는 `view-users`, 변경은 `edit-users`입니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/users?page=` - 사용자 목록 (역할 포함, 페이지당 15개)
//! - `POST /api/users` - 사용자 생성
//! - `GET /api/users/{id}` - 사용자 조회
//! - `PUT /api/users/{id}` - 사용자 수정
//! - `DELETE /api/users/{id}` - 사용자 삭제

use admin_core::{paginate, AdminError, Paginated, User, UserWithRole};
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

use crate::auth::{hash_password, Authorized, UsersPage};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{PageParam, PageQuery, ValidatedJson};
use crate::repository::{NewUser, UserChanges, UserPages, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request Types
// ================================================================================================

/// 사용자 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "firstname is required"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100, message = "lastname is required"))]
    pub lastname: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[serde(default)]
    pub phone_no: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// 역할 ID
    pub role_id: i64,
}

/// 사용자 수정 요청. 생략한 필드는 유지됩니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub lastname: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub role_id: Option<i64>,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 사용자 목록.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageQuery),
    responses(
        (status = 200, description = "사용자 페이지", body = Paginated<UserWithRole>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn list_users(
    _auth: Authorized<UsersPage>,
    State(state): State<Arc<AppState>>,
    PageParam(page): PageParam,
) -> ApiResult<Json<Paginated<UserWithRole>>> {
    let users = paginate(&UserPages::new(&state.db_pool), page.page()).await?;
    Ok(Json(users))
}

/// 사용자 생성.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "생성된 사용자", body = User),
        (status = 400, description = "잘못된 입력 또는 존재하지 않는 역할", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    )
)]
pub async fn create_user(
    Authorized(actor, _): Authorized<UsersPage>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = UserRepository::create(
        &state.db_pool,
        &NewUser {
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            phone_no: req.phone_no,
            password_hash: hash_password(&req.password)?,
            role_id: req.role_id,
        },
    )
    .await?;

    info!(actor = actor.user_id, user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자", body = UserWithRole),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_user(
    _auth: Authorized<UsersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserWithRole>> {
    let user = UserRepository::find_with_role(&state.db_pool, id)
        .await?
        .ok_or_else(|| AdminError::not_found("user", id))?;
    Ok(Json(user))
}

/// 사용자 수정.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정된 사용자", body = User),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn update_user(
    Authorized(actor, _): Authorized<UsersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let changes = UserChanges {
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
        phone_no: req.phone_no,
        role_id: req.role_id,
    };

    let user = UserRepository::update(&state.db_pool, id, &changes)
        .await?
        .ok_or_else(|| AdminError::not_found("user", id))?;

    info!(actor = actor.user_id, user_id = id, "User updated");
    Ok(Json(user))
}

/// 사용자 삭제.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_user(
    Authorized(actor, _): Authorized<UsersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !UserRepository::delete(&state.db_pool, id).await? {
        return Err(AdminError::not_found("user", id).into());
    }

    info!(actor = actor.user_id, user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 사용자 라우터 생성 (`/api` 아래에 병합).
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_requires_password_and_role() {
        let missing_role = serde_json::from_str::<CreateUserRequest>(
            r#"{"firstname":"A","lastname":"B","email":"a@b.io","password":"x"}"#,
        );
        assert!(missing_role.is_err());

        let empty_password: CreateUserRequest = serde_json::from_str(
            r#"{"firstname":"A","lastname":"B","email":"a@b.io","password":"","role_id":2}"#,
        )
        .unwrap();
        assert!(empty_password.validate().is_err());
    }
}
