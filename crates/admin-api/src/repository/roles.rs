//! Role Repository
//!
//! 역할과 역할-권한 연결을 관리합니다. 권한 집합 교체는 하나의 트랜잭션에서 수행됩니다.

use std::collections::HashMap;

use admin_core::{Permission, Role};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: i64,
    id: i64,
    name: String,
}

/// Role Repository
pub struct RoleRepository;

impl RoleRepository {
    /// 권한 포함 전체 역할 (ID 순)
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let roles = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(pool)
            .await?;

        let links = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT rp.role_id, p.id, p.name
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            ORDER BY rp.role_id, p.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut by_role: HashMap<i64, Vec<Permission>> = HashMap::new();
        for link in links {
            by_role.entry(link.role_id).or_default().push(Permission {
                id: link.id,
                name: link.name,
            });
        }

        Ok(roles
            .into_iter()
            .map(|row| Role {
                permissions: by_role.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
            })
            .collect())
    }

    /// 권한 포함 역할 조회
    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Role>, sqlx::Error> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let permissions = Self::permissions_of(pool, row.id).await?;
        Ok(Some(Role {
            id: row.id,
            name: row.name,
            permissions,
        }))
    }

    /// 역할이 가진 권한
    pub async fn permissions_of(pool: &PgPool, role_id: i64) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(role_id)
        .fetch_all(pool)
        .await
    }

    /// 역할이 가진 권한 이름
    pub async fn permission_names(pool: &PgPool, role_id: i64) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            "#,
        )
        .bind(role_id)
        .fetch_all(pool)
        .await
    }

    /// 역할 생성
    pub async fn create(
        pool: &PgPool,
        name: &str,
        permission_ids: &[i64],
    ) -> Result<Role, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_permissions(&mut tx, row.id, permission_ids).await?;
        let permissions = Self::permissions_in_tx(&mut tx, row.id).await?;

        tx.commit().await?;

        Ok(Role {
            id: row.id,
            name: row.name,
            permissions,
        })
    }

    /// 이름과 권한 집합 교체. 대상이 없으면 `None`.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: &str,
        permission_ids: &[i64],
    ) -> Result<Option<Role>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, RoleRow>(
            "UPDATE roles SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::link_permissions(&mut tx, id, permission_ids).await?;
        let permissions = Self::permissions_in_tx(&mut tx, id).await?;

        tx.commit().await?;

        Ok(Some(Role {
            id: row.id,
            name: row.name,
            permissions,
        }))
    }

    /// 역할 삭제. 대상이 있었는지 반환합니다.
    ///
    /// 역할을 사용하는 사용자가 있으면 외래 키 위반으로 실패합니다.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn link_permissions(
        tx: &mut Transaction<'_, Postgres>,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        if permission_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn permissions_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        role_id: i64,
    ) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&mut **tx)
        .await
    }
}
