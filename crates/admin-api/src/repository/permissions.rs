//! Permission Repository
//!
//! 권한은 읽기 전용 참조 데이터입니다.

use admin_core::Permission;
use sqlx::PgPool;

/// Permission Repository
pub struct PermissionRepository;

impl PermissionRepository {
    /// 전체 권한 (ID 순)
    pub async fn list(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>("SELECT id, name FROM permissions ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
