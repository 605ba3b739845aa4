//! 일별 매출 집계.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 하루 매출 합계 (`date`는 `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct SalesPoint {
    pub date: String,
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String))]
    pub sum: Decimal,
}
