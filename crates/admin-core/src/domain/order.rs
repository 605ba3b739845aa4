//! 주문 엔티티.
//!
//! - `Order` - orders 테이블 행
//! - `OrderItem` - order_items 테이블 행
//! - `OrderWithItems` - 주문과 항목 묶음 (합계 계산, 내보내기용)
//! - `OrderDetail` - API 응답 형태 (이름 결합, 합계 포함)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 주문.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 고객 전체 이름.
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// 주문 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_title: String,
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String))]
    pub price: Decimal,
    pub quantity: i32,
}

impl OrderItem {
    /// 가격 × 수량.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// 주문과 항목.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// 주문 합계 (모든 항목의 가격 × 수량).
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// 주문 ID별로 항목을 묶습니다.
    ///
    /// 항목이 없는 주문도 빈 목록으로 포함됩니다. 주문 순서는 유지됩니다.
    pub fn group(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderWithItems> {
        let mut by_order: std::collections::HashMap<i64, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect()
    }
}

/// 주문 응답.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct OrderDetail {
    pub id: i64,
    /// "이름 성"
    pub name: String,
    pub email: String,
    /// 항목 합계
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String))]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order_items: Vec<OrderItem>,
}

impl From<OrderWithItems> for OrderDetail {
    fn from(value: OrderWithItems) -> Self {
        let total = value.total();
        let OrderWithItems { order, items } = value;
        Self {
            id: order.id,
            name: order.customer_name(),
            email: order.email,
            total,
            created_at: order.created_at,
            updated_at: order.updated_at,
            order_items: items,
        }
    }
}
