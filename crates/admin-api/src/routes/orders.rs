//! 주문 API 라우트
//!
//! 모든 엔드포인트는 `orders` 페이지 권한이 필요합니다. 내보내기와 차트도 같은 권한을 씁니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/orders?page=` - 주문 목록 (항목, 이름, 합계 포함)
//! - `POST /api/orders` - 주문 생성 (항목 포함)
//! - `GET /api/orders/{id}` - 주문 조회
//! - `PUT /api/orders/{id}` - 고객 정보 수정
//! - `DELETE /api/orders/{id}` - 주문 삭제
//! - `POST /api/export` - 전체 주문 CSV 다운로드
//! - `GET /api/chart` - 일별 매출

use admin_core::{paginate, AdminError, OrderDetail, Paginated, SalesPoint};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::{Authorized, OrdersPage};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::export::{render_orders_csv, write_export, EXPORT_FILE_NAME};
use crate::extract::{PageParam, PageQuery, ValidatedJson};
use crate::repository::{
    NewOrder, NewOrderItem, OrderChanges, OrderPages, OrderRepository, SalesRepository,
};
use crate::state::AppState;

// ================================================================================================
// Request Types
// ================================================================================================

/// 주문 항목 입력
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    #[validate(length(min = 1, max = 255, message = "product_title is required"))]
    pub product_title: String,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// 주문 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100, message = "firstname is required"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100, message = "lastname is required"))]
    pub lastname: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "at least one item is required"), nested)]
    pub order_items: Vec<OrderItemRequest>,
}

/// 주문 수정 요청. 생략한 필드는 유지됩니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub lastname: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        NewOrder {
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            items: req
                .order_items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_title: item.product_title,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 주문 목록.
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    params(PageQuery),
    responses(
        (status = 200, description = "주문 페이지", body = Paginated<OrderDetail>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn list_orders(
    _auth: Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
    PageParam(page): PageParam,
) -> ApiResult<Json<Paginated<OrderDetail>>> {
    let orders = paginate(&OrderPages::new(&state.db_pool), page.page()).await?;
    Ok(Json(orders.map(OrderDetail::from)))
}

/// 주문 생성.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "생성된 주문", body = OrderDetail),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse)
    )
)]
pub async fn create_order(
    Authorized(actor, _): Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderDetail>)> {
    let order = OrderRepository::create(&state.db_pool, &NewOrder::from(req)).await?;

    info!(
        actor = actor.user_id,
        order_id = order.order.id,
        items = order.items.len(),
        "Order created"
    );
    Ok((StatusCode::CREATED, Json(OrderDetail::from(order))))
}

/// 주문 조회.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "주문 ID")),
    responses(
        (status = 200, description = "주문", body = OrderDetail),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_order(
    _auth: Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<OrderDetail>> {
    let order = OrderRepository::find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AdminError::not_found("order", id))?;
    Ok(Json(OrderDetail::from(order)))
}

/// 주문 고객 정보 수정.
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "주문 ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "수정된 주문", body = OrderDetail),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn update_order(
    Authorized(actor, _): Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateOrderRequest>,
) -> ApiResult<Json<OrderDetail>> {
    let changes = OrderChanges {
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
    };

    let order = OrderRepository::update(&state.db_pool, id, &changes)
        .await?
        .ok_or_else(|| AdminError::not_found("order", id))?;

    info!(actor = actor.user_id, order_id = id, "Order updated");
    Ok(Json(OrderDetail::from(order)))
}

/// 주문 삭제 (항목 포함).
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "주문 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_order(
    Authorized(actor, _): Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !OrderRepository::delete(&state.db_pool, id).await? {
        return Err(AdminError::not_found("order", id).into());
    }

    info!(actor = actor.user_id, order_id = id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 전체 주문 CSV 내보내기.
///
/// 설정된 경로에 파일을 쓰고 같은 내용을 첨부 파일로 반환합니다.
#[utoipa::path(
    post,
    path = "/api/export",
    tag = "orders",
    responses(
        (status = 200, description = "orders.csv", content_type = "text/csv", body = String),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn export_orders(
    Authorized(actor, _): Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let orders = OrderRepository::all_with_items(&state.db_pool).await?;
    let bytes = render_orders_csv(&orders)?;
    write_export(&state.export_path, &bytes).await?;

    info!(
        actor = actor.user_id,
        orders = orders.len(),
        path = %state.export_path.display(),
        "Orders exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    ))
}

/// 일별 매출.
#[utoipa::path(
    get,
    path = "/api/chart",
    tag = "orders",
    responses(
        (status = 200, description = "날짜 오름차순 매출 합계", body = Vec<SalesPoint>),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn sales_chart(
    _auth: Authorized<OrdersPage>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SalesPoint>>> {
    Ok(Json(SalesRepository::daily_totals(&state.db_pool).await?))
}

/// 주문 라우터 생성 (`/api` 아래에 병합).
pub fn orders_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/export", post(export_orders))
        .route("/chart", get(sales_chart))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_json(items: &str) -> String {
        format!(
            r#"{{"firstname":"Ada","lastname":"Lovelace","email":"ada@example.com","order_items":{}}}"#,
            items
        )
    }

    #[test]
    fn test_create_order_valid() {
        let req: CreateOrderRequest = serde_json::from_str(&order_json(
            r#"[{"product_title":"Pen","price":"1.99","quantity":3}]"#,
        ))
        .unwrap();
        assert!(req.validate().is_ok());

        let order = NewOrder::from(req);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
    }

    #[test]
    fn test_create_order_requires_items() {
        let req: CreateOrderRequest = serde_json::from_str(&order_json("[]")).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_item_rules_are_checked() {
        let zero_quantity: CreateOrderRequest = serde_json::from_str(&order_json(
            r#"[{"product_title":"Pen","price":"1.99","quantity":0}]"#,
        ))
        .unwrap();
        assert!(zero_quantity.validate().is_err());

        let negative_price: CreateOrderRequest = serde_json::from_str(&order_json(
            r#"[{"product_title":"Pen","price":"-1","quantity":1}]"#,
        ))
        .unwrap();
        assert!(negative_price.validate().is_err());
    }
}
