//! 신원 토큰 처리.
//!
//! HS256으로 서명된 JWT에 사용자 ID(`iss`)와 만료 시각(`exp`)을 담습니다.
//! 서버 측 폐기 목록은 없으며, 토큰은 만료되거나 클라이언트가 버릴 때만 무효화됩니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// 토큰 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer - 사용자 ID
    pub iss: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `ttl_hours` - 유효 시간 (시간)
    pub fn new(user_id: i64, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            iss: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    /// `iss`를 사용자 ID로 해석.
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.iss.parse().map_err(|_| TokenError::Invalid)
    }
}

/// 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// 토큰 발급/검증 설정.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    ttl_hours: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    /// 사용자 ID로 토큰 발급.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        encode_claims(&Claims::new(user_id, self.ttl_hours), &self.secret)
    }

    /// 토큰 검증 후 사용자 ID 반환.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        decode_claims(token, &self.secret)?.user_id()
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Claims를 서명된 토큰으로 인코딩.
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::from)
}

/// 토큰 디코딩 및 검증.
///
/// 서명 불일치, 형식 오류, 만료 모두 실패합니다. 만료 판정에 여유 시간은 두지 않습니다.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
