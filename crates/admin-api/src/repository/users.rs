//! User Repository
//!
//! 사용자 관련 데이터베이스 연산을 담당합니다.

use admin_core::{PageSource, RoleRef, User, UserWithRole};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

// ================================================================================================
// Types
// ================================================================================================

/// 새 사용자 입력 (비밀번호는 해시된 상태)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_no: String,
    pub password_hash: String,
    pub role_id: i64,
}

/// 사용자 수정 입력. `None`인 필드는 유지됩니다.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub role_id: Option<i64>,
}

#[derive(Debug, FromRow)]
struct UserRoleRow {
    #[sqlx(flatten)]
    user: User,
    role_name: String,
}

impl From<UserRoleRow> for UserWithRole {
    fn from(row: UserRoleRow) -> Self {
        let role = RoleRef {
            id: row.user.role_id,
            name: row.role_name,
        };
        UserWithRole {
            user: row.user,
            role,
        }
    }
}

const USER_COLUMNS: &str = "u.id, u.firstname, u.lastname, u.email, u.phone_no, u.password, u.role_id";

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// ID로 사용자 조회
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 이메일로 사용자 조회
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// 역할 포함 사용자 조회
    pub async fn find_with_role(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<UserWithRole>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRoleRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(UserWithRole::from))
    }

    /// 전체 사용자 수
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// 역할 포함 사용자 목록 (ID 순)
    pub async fn list_with_role(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserRoleRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            ORDER BY u.id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(UserWithRole::from).collect())
    }

    /// 사용자 생성
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (firstname, lastname, email, phone_no, password, role_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, firstname, lastname, email, phone_no, password, role_id
            "#,
        )
        .bind(&input.firstname)
        .bind(&input.lastname)
        .bind(&input.email)
        .bind(&input.phone_no)
        .bind(&input.password_hash)
        .bind(input.role_id)
        .fetch_one(pool)
        .await
    }

    /// 사용자 수정. 대상이 없으면 `None`.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: &UserChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                phone_no = COALESCE($5, phone_no),
                role_id = COALESCE($6, role_id)
            WHERE id = $1
            RETURNING id, firstname, lastname, email, phone_no, password, role_id
            "#,
        )
        .bind(id)
        .bind(&changes.firstname)
        .bind(&changes.lastname)
        .bind(&changes.email)
        .bind(&changes.phone_no)
        .bind(changes.role_id)
        .fetch_optional(pool)
        .await
    }

    /// 비밀번호 해시 교체. 대상이 있었는지 반환합니다.
    pub async fn update_password(
        pool: &PgPool,
        id: i64,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 사용자 삭제. 대상이 있었는지 반환합니다.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 사용자 목록 페이지 원본.
pub struct UserPages<'a> {
    pool: &'a PgPool,
}

impl<'a> UserPages<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageSource for UserPages<'_> {
    type Item = UserWithRole;
    type Error = sqlx::Error;

    async fn count(&self) -> Result<i64, sqlx::Error> {
        UserRepository::count(self.pool).await
    }

    async fn take(&self, limit: i64, offset: i64) -> Result<Vec<UserWithRole>, sqlx::Error> {
        UserRepository::list_with_role(self.pool, limit, offset).await
    }
}
