//! 신원 토큰 쿠키.
//!
//! 로그인/회원가입 시 토큰을 HttpOnly 쿠키로 내려보내고, 로그아웃 시 만료시킵니다.

use admin_core::{AdminError, AuthConfig};
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;

/// 세션 쿠키 설정.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
    max_age_secs: i64,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool, ttl_hours: i64) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age_secs: ttl_hours.saturating_mul(3600),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.cookie_name.clone(),
            config.cookie_secure,
            config.token_ttl_hours,
        )
    }

    /// 요청 쿠키에서 토큰 추출.
    pub fn token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    /// 토큰을 담은 쿠키.
    pub fn issue(&self, token: &str) -> Result<Cookie<'static>, AdminError> {
        self.build(token, self.max_age_secs)
    }

    /// 브라우저에서 쿠키를 지우는 만료 쿠키.
    pub fn clear(&self) -> Result<Cookie<'static>, AdminError> {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age_secs: i64) -> Result<Cookie<'static>, AdminError> {
        let mut raw = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.name, value, max_age_secs
        );
        if self.secure {
            raw.push_str("; Secure");
        }

        Cookie::parse(raw).map_err(|e| AdminError::Internal(format!("cookie: {}", e)))
    }
}
