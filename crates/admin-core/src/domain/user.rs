//! 사용자 엔티티.

use serde::Serialize;

use super::role::RoleRef;

/// 사용자.
///
/// `password_hash`는 직렬화되지 않습니다.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_no: String,
    #[serde(skip_serializing)]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "password"))]
    #[cfg_attr(feature = "utoipa-support", schema(ignore))]
    pub password_hash: String,
    pub role_id: i64,
}

/// 역할이 포함된 사용자.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserWithRole {
    #[serde(flatten)]
    pub user: User,
    pub role: RoleRef,
}
