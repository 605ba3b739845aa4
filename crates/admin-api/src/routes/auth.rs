//! 인증 API 라우트
//!
//! # 엔드포인트
//!
//! - `POST /api/register` - 회원가입 (토큰 쿠키 발급)
//! - `POST /api/login` - 로그인 (토큰 쿠키 발급)
//! - `GET /api/user` - 현재 사용자, 역할, 권한
//! - `POST /api/logout` - 토큰 쿠키 삭제
//! - `PUT /api/users/info` - 내 정보 수정
//! - `PUT /api/users/password` - 내 비밀번호 변경

use admin_core::{AdminError, Capability, Grants, Role, User};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, passwords_match, verify_login, Authenticated};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::metrics::record_login;
use crate::repository::{NewUser, RoleRepository, UserChanges, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 회원가입 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
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
    pub password_confirm: String,
}

/// 로그인 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// 내 정보 수정 요청. 생략한 필드는 유지됩니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInfoRequest {
    #[validate(length(min = 1, max = 100))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub lastname: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone_no: Option<String>,
}

/// 비밀번호 변경 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub password_confirm: String,
}

/// 현재 사용자 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: User,
    /// 역할 (권한 포함)
    pub role: Role,
    /// 권한 이름 목록
    pub permissions: Vec<String>,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 회원가입.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 완료, jwt 쿠키 발급", body = User),
        (status = 400, description = "비밀번호 확인 불일치 등 잘못된 입력", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<User>)> {
    passwords_match(&req.password, &req.password_confirm)?;

    let user = UserRepository::create(
        &state.db_pool,
        &NewUser {
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            phone_no: req.phone_no,
            password_hash: hash_password(&req.password)?,
            role_id: state.default_role_id,
        },
    )
    .await?;

    let token = state.tokens.issue(user.id)?;
    let jar = jar.add(state.session.issue(&token)?);

    info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, jar, Json(user)))
}

/// 로그인.
///
/// 존재하지 않는 이메일과 틀린 비밀번호는 같은 응답을 반환합니다.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공, jwt 쿠키 발급", body = User),
        (status = 400, description = "잘못된 이메일 또는 비밀번호", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<User>)> {
    let user = UserRepository::find_by_email(&state.db_pool, &req.email).await?;
    let verified = verify_login(
        &req.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );

    let Some(user) = user.filter(|_| verified) else {
        record_login(false);
        warn!("Login failed");
        return Err(AdminError::Validation("invalid email or password".to_string()).into());
    };

    let token = state.tokens.issue(user.id)?;
    let jar = jar.add(state.session.issue(&token)?);

    record_login(true);
    info!(user_id = user.id, "User logged in");
    Ok((jar, Json(user)))
}

/// 현재 사용자.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "auth",
    responses(
        (status = 200, description = "현재 사용자", body = CurrentUserResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    )
)]
pub async fn current_user(
    Authenticated(principal): Authenticated,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user = UserRepository::find_by_id(&state.db_pool, principal.user_id)
        .await?
        .ok_or(AdminError::Unauthenticated)?;
    let role = RoleRepository::find(&state.db_pool, user.role_id)
        .await?
        .ok_or_else(|| AdminError::not_found("role", user.role_id))?;

    Ok(Json(CurrentUserResponse {
        user,
        role,
        permissions: granted_permissions(&principal.grants),
    }))
}

/// 판정에 실제로 쓰이는 권한만 정규화된 이름으로 정렬해 반환합니다.
fn granted_permissions(grants: &Grants) -> Vec<String> {
    let mut names: Vec<String> = grants.capabilities().map(Capability::name).collect();
    names.sort();
    names
}

/// 로그아웃.
///
/// 유효한 토큰이 없어도 쿠키를 지우고 204를 반환합니다.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses((status = 204, description = "jwt 쿠키 삭제"))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(StatusCode, CookieJar)> {
    let jar = jar.add(state.session.clear()?);
    Ok((StatusCode::NO_CONTENT, jar))
}

/// 내 정보 수정.
#[utoipa::path(
    put,
    path = "/api/users/info",
    tag = "auth",
    request_body = UpdateInfoRequest,
    responses(
        (status = 200, description = "수정된 사용자", body = User),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    )
)]
pub async fn update_info(
    Authenticated(principal): Authenticated,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<UpdateInfoRequest>,
) -> ApiResult<Json<User>> {
    let changes = UserChanges {
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
        phone_no: req.phone_no,
        role_id: None,
    };

    let user = UserRepository::update(&state.db_pool, principal.user_id, &changes)
        .await?
        .ok_or(AdminError::Unauthenticated)?;

    info!(user_id = user.id, "Profile updated");
    Ok(Json(user))
}

/// 내 비밀번호 변경.
#[utoipa::path(
    put,
    path = "/api/users/password",
    tag = "auth",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "변경 완료"),
        (status = 400, description = "비밀번호 확인 불일치", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    )
)]
pub async fn update_password(
    Authenticated(principal): Authenticated,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<StatusCode> {
    passwords_match(&req.password, &req.password_confirm)?;

    let hash = hash_password(&req.password)?;
    if !UserRepository::update_password(&state.db_pool, principal.user_id, &hash).await? {
        return Err(AdminError::Unauthenticated.into());
    }

    info!(user_id = principal.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// 인증 라우터 생성 (`/api` 아래에 병합).
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user", get(current_user))
        .route("/logout", post(logout))
        .route("/users/info", put(update_info))
        .route("/users/password", put(update_password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rules() {
        let mut req = RegisterRequest {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_no: String::new(),
            password: "secret".into(),
            password_confirm: "secret".into(),
        };
        assert!(req.validate().is_ok());

        req.email = "not-an-email".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_granted_permissions_are_normalized() {
        let grants = Grants::from_names(["view_users", "EDIT-orders", "manage-everything"]);
        assert_eq!(
            granted_permissions(&grants),
            vec!["edit-orders".to_string(), "view-users".to_string()]
        );
        assert!(granted_permissions(&Grants::default()).is_empty());
    }

    #[test]
    fn test_update_info_allows_partial_body() {
        let req: UpdateInfoRequest = serde_json::from_str(r#"{"phone_no":"555-0101"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.firstname.is_none());

        let bad: UpdateInfoRequest = serde_json::from_str(r#"{"firstname":""}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
