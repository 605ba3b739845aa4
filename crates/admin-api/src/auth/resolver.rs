//! 요청 권한 판정.
//!
//! 1. 토큰을 검증합니다. 누락, 위조, 만료는 모두 `Unauthenticated`입니다.
//! 2. 토큰의 사용자를 조회합니다. 삭제된 사용자도 `Unauthenticated`입니다.
//! 3. 사용자 역할의 권한 집합을 읽습니다.
//! 4. Read는 `view-<page>` 또는 `edit-<page>`, Write는 `edit-<page>`가 있어야 허용됩니다.
//! 5. 그 외에는 `Unauthorized`입니다.
//!
//! 역할과 권한은 요청마다 저장소에서 다시 읽습니다. 권한 변경은 즉시 반영됩니다.

use admin_core::{Action, AdminError, Grants, Resource};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use super::jwt::TokenConfig;
use crate::metrics::record_authz_decision;
use crate::repository::RoleRepository;

/// 인증된 호출자.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub grants: Grants,
}

impl Principal {
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        self.grants.allows(resource, action)
    }
}

/// 사용자 ID로 호출자 정보를 읽는 저장소.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// 사용자가 없으면 `None`.
    async fn load_principal(&self, user_id: i64) -> Result<Option<Principal>, AdminError>;
}

/// PostgreSQL 기반 저장소.
#[derive(Debug, Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PrincipalRow {
    user_id: i64,
    role_id: i64,
    role_name: String,
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn load_principal(&self, user_id: i64) -> Result<Option<Principal>, AdminError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT u.id AS user_id, r.id AS role_id, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let names = RoleRepository::permission_names(&self.pool, row.role_id).await?;

        Ok(Some(Principal {
            user_id: row.user_id,
            role_id: row.role_id,
            role_name: row.role_name,
            grants: Grants::from_names(names),
        }))
    }
}

/// 토큰 검증 후 호출자 조회 (1-2단계).
pub async fn authenticate(
    store: &dyn AccessStore,
    tokens: &TokenConfig,
    token: Option<&str>,
) -> Result<Principal, AdminError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(AdminError::Unauthenticated)?;

    let user_id = tokens.verify(token).map_err(|e| {
        debug!(error = %e, "Rejected identity token");
        AdminError::Unauthenticated
    })?;

    match store.load_principal(user_id).await? {
        Some(principal) => Ok(principal),
        None => {
            debug!(user_id, "Token subject no longer exists");
            Err(AdminError::Unauthenticated)
        }
    }
}

/// 리소스/동작에 대한 권한 판정.
///
/// 허용되면 호출자 정보를 반환합니다.
pub async fn authorize(
    store: &dyn AccessStore,
    tokens: &TokenConfig,
    token: Option<&str>,
    resource: Resource,
    action: Action,
) -> Result<Principal, AdminError> {
    let principal = match authenticate(store, tokens, token).await {
        Ok(principal) => principal,
        Err(AdminError::Unauthenticated) => {
            record_authz_decision(resource, action, "unauthenticated");
            debug!(%resource, %action, outcome = "unauthenticated", "Access decision");
            return Err(AdminError::Unauthenticated);
        }
        Err(e) => return Err(e),
    };

    if principal.can(resource, action) {
        record_authz_decision(resource, action, "allowed");
        debug!(
            user_id = principal.user_id,
            role = %principal.role_name,
            %resource,
            %action,
            outcome = "allowed",
            "Access decision"
        );
        Ok(principal)
    } else {
        record_authz_decision(resource, action, "denied");
        warn!(
            user_id = principal.user_id,
            role = %principal.role_name,
            %resource,
            %action,
            outcome = "denied",
            "Access decision"
        );
        Err(AdminError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use super::*;

    /// 테스트용 메모리 저장소.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryAccessStore {
        principals: HashMap<i64, Principal>,
    }

    impl MemoryAccessStore {
        pub(crate) fn with_user(mut self, user_id: i64, role: &str, permissions: &[&str]) -> Self {
            self.principals.insert(
                user_id,
                Principal {
                    user_id,
                    role_id: user_id,
                    role_name: role.to_string(),
                    grants: Grants::from_names(permissions.iter().copied()),
                },
            );
            self
        }
    }

    #[async_trait]
    impl AccessStore for MemoryAccessStore {
        async fn load_principal(&self, user_id: i64) -> Result<Option<Principal>, AdminError> {
            Ok(self.principals.get(&user_id).cloned())
        }
    }
}
