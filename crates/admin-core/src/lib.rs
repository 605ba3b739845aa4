//! # Admin Core
//!
//! 관리자 백엔드의 핵심 도메인 모델 및 규칙을 제공합니다.
//!
//! 이 크레이트는 HTTP 계층과 무관하게 사용되는 기본 타입을 제공합니다:
//! - 사용자, 역할, 권한, 주문 엔티티
//! - 페이지 단위 접근 권한 모델 (리소스 × 동작)
//! - 페이지네이션
//! - 설정 관리
//! - 로깅 인프라
//! - 에러 분류

pub mod access;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pagination;

pub use access::{AccessLevel, Action, Capability, Grants, Resource};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use pagination::{paginate, PageMeta, PageRequest, PageSource, Paginated, PAGE_SIZE};
