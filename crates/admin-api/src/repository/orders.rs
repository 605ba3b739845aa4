//! Order Repository
//!
//! 주문과 주문 항목을 관리합니다. 주문 생성은 항목과 함께 하나의 트랜잭션에서 수행되며,
//! 주문 삭제 시 항목은 외래 키의 `ON DELETE CASCADE`로 함께 삭제됩니다.

use admin_core::{Order, OrderItem, OrderWithItems, PageSource};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

// ================================================================================================
// Types
// ================================================================================================

/// 새 주문 항목 입력
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_title: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// 새 주문 입력
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub items: Vec<NewOrderItem>,
}

/// 주문 고객 정보 수정. `None`인 필드는 유지됩니다.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

const ORDER_COLUMNS: &str = "id, firstname, lastname, email, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_title, price, quantity";

// ================================================================================================
// Repository
// ================================================================================================

/// Order Repository
pub struct OrderRepository;

impl OrderRepository {
    /// 전체 주문 수
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
    }

    /// 항목 포함 주문 목록 (ID 순)
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithItems>, sqlx::Error> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Self::attach_items(pool, orders).await
    }

    /// 항목 포함 전체 주문 (내보내기용)
    pub async fn all_with_items(pool: &PgPool) -> Result<Vec<OrderWithItems>, sqlx::Error> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Self::attach_items(pool, orders).await
    }

    /// 항목 포함 주문 조회
    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<OrderWithItems>, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let mut grouped = Self::attach_items(pool, vec![order]).await?;
        Ok(grouped.pop())
    }

    /// 주문과 항목 생성
    pub async fn create(pool: &PgPool, input: &NewOrder) -> Result<OrderWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (firstname, lastname, email)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&input.firstname)
        .bind(&input.lastname)
        .bind(&input.email)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let created = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items (order_id, product_title, price, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(&item.product_title)
            .bind(item.price)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;
            items.push(created);
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// 고객 정보 수정. 대상이 없으면 `None`.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: &OrderChanges,
    ) -> Result<Option<OrderWithItems>, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET
                firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.firstname)
        .bind(&changes.lastname)
        .bind(&changes.email)
        .fetch_optional(pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let mut grouped = Self::attach_items(pool, vec![order]).await?;
        Ok(grouped.pop())
    }

    /// 주문 삭제. 대상이 있었는지 반환합니다.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 주문 ID 목록의 항목
    pub async fn items_for(pool: &PgPool, order_ids: &[i64]) -> Result<Vec<OrderItem>, sqlx::Error> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id"
        ))
        .bind(order_ids)
        .fetch_all(pool)
        .await
    }

    async fn attach_items(
        pool: &PgPool,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderWithItems>, sqlx::Error> {
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let items = Self::items_for(pool, &ids).await?;
        Ok(OrderWithItems::group(orders, items))
    }
}

/// 주문 목록 페이지 원본.
pub struct OrderPages<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderPages<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageSource for OrderPages<'_> {
    type Item = OrderWithItems;
    type Error = sqlx::Error;

    async fn count(&self) -> Result<i64, sqlx::Error> {
        OrderRepository::count(self.pool).await
    }

    async fn take(&self, limit: i64, offset: i64) -> Result<Vec<OrderWithItems>, sqlx::Error> {
        OrderRepository::list(self.pool, limit, offset).await
    }
}
