//! Axum용 인증/권한 추출기.
//!
//! `jwt` 쿠키에서 토큰을 읽어 호출자를 확인합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn delete_order(
//!     Authorized(principal, _): Authorized<OrdersPage>,
//!     Path(id): Path<i64>,
//! ) -> ApiResult<StatusCode> {
//!     // DELETE는 edit-orders 권한이 있어야 여기까지 옵니다.
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use admin_core::{Action, Resource};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use super::resolver::{authenticate, authorize, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// 권한으로 보호되는 페이지 표식.
pub trait Page: Send + Sync + 'static {
    const RESOURCE: Resource;
}

/// `users` 페이지.
#[derive(Debug)]
pub struct UsersPage;

/// `roles` 페이지.
#[derive(Debug)]
pub struct RolesPage;

/// `orders` 페이지 (내보내기, 차트 포함).
#[derive(Debug)]
pub struct OrdersPage;

/// `images` 페이지.
#[derive(Debug)]
pub struct ImagesPage;

impl Page for UsersPage {
    const RESOURCE: Resource = Resource::Users;
}

impl Page for RolesPage {
    const RESOURCE: Resource = Resource::Roles;
}

impl Page for OrdersPage {
    const RESOURCE: Resource = Resource::Orders;
}

impl Page for ImagesPage {
    const RESOURCE: Resource = Resource::Images;
}

/// 인증된 호출자 추출기.
///
/// 토큰이 없거나 유효하지 않으면 401을 반환합니다.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = state.session.token(&jar);

        let principal = authenticate(state.access.as_ref(), &state.tokens, token).await?;
        Ok(Authenticated(principal))
    }
}

/// 페이지 권한 추출기.
///
/// 동작은 요청 메서드로 결정됩니다 (GET/HEAD는 Read, 나머지는 Write).
/// 인증 실패는 401, 권한 부족은 403입니다.
#[derive(Debug)]
pub struct Authorized<P: Page>(pub Principal, pub PhantomData<fn() -> P>);

impl<P: Page> Authorized<P> {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl<P: Page> FromRequestParts<Arc<AppState>> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = state.session.token(&jar);
        let action = Action::from_method(&parts.method);

        let principal =
            authorize(state.access.as_ref(), &state.tokens, token, P::RESOURCE, action).await?;
        Ok(Authorized(principal, PhantomData))
    }
}
