//! 인증 및 권한 부여.
//!
//! 쿠키에 담긴 JWT로 호출자를 확인하고, 역할의 페이지 권한으로 요청을 허용하거나 거부합니다.
//!
//! # 구성 요소
//!
//! - [`TokenConfig`]: 토큰 발급/검증
//! - [`SessionCookie`]: 토큰 쿠키 생성/삭제
//! - [`hash_password`], [`verify_password`], [`verify_login`]: Argon2 비밀번호 해싱
//! - [`authorize`], [`authenticate`]: 권한 판정
//! - [`Authenticated`], [`Authorized`]: Axum 추출기

mod cookie;
mod jwt;
mod middleware;
mod password;
mod resolver;

#[cfg(test)]
pub(crate) use resolver::memory::MemoryAccessStore;

pub use cookie::SessionCookie;
pub use jwt::{decode_claims, encode_claims, Claims, TokenConfig, TokenError};
pub use middleware::{
    Authenticated, Authorized, ImagesPage, OrdersPage, Page, RolesPage, UsersPage,
};
pub use password::{hash_password, passwords_match, verify_login, verify_password, PasswordError};
pub use resolver::{authenticate, authorize, AccessStore, PgAccessStore, Principal};
