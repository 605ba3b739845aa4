//! Sales Repository
//!
//! 주문 항목 금액을 일 단위로 집계합니다.

use admin_core::SalesPoint;
use sqlx::PgPool;

/// Sales Repository
pub struct SalesRepository;

impl SalesRepository {
    /// 일별 매출 합계 (`price * quantity`), 날짜 오름차순.
    ///
    /// 항목이 없는 날짜는 포함되지 않습니다.
    pub async fn daily_totals(pool: &PgPool) -> Result<Vec<SalesPoint>, sqlx::Error> {
        sqlx::query_as::<_, SalesPoint>(
            r#"
            SELECT to_char(o.created_at, 'YYYY-MM-DD') AS date,
                   SUM(oi.price * oi.quantity) AS sum
            FROM orders o
            JOIN order_items oi ON o.id = oi.order_id
            GROUP BY date
            ORDER BY date
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
