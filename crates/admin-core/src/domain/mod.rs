//! 도메인 엔티티.
//!
//! - `user` - 사용자 및 역할 요약
//! - `role` - 역할과 권한
//! - `order` - 주문, 주문 항목, 합계
//! - `sales` - 일별 매출 집계

pub mod order;
pub mod role;
pub mod sales;
pub mod user;

pub use order::*;
pub use role::*;
pub use sales::*;
pub use user::*;
