//! 역할과 권한 엔티티.

use serde::{Deserialize, Serialize};

/// 권한 (예: `view-orders`). 읽기 전용 참조 데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Permission {
    pub id: i64,
    pub name: String,
}

/// 역할 요약 (id, 이름).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct RoleRef {
    pub id: i64,
    pub name: String,
}

/// 권한 목록을 포함한 역할.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<Permission>,
}
