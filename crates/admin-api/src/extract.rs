//! 요청 본문/쿼리 추출기.
//!
//! 파싱 실패를 API 에러 형식(400)으로 반환합니다.

use admin_core::{AdminError, PageRequest};
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::ApiError;

/// JSON 본문을 파싱하고 `validator` 규칙으로 검증합니다.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AdminError::Validation(rejection.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// 목록 쿼리 (`?page=`).
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 페이지 번호 (기본값 1, 1 미만은 1로 보정)
    #[serde(default = "first_page", deserialize_with = "page_number")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// `?page=`처럼 값이 비어 있으면 첫 페이지로 봅니다.
fn page_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(first_page());
    }
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("page must be an integer, got `{}`", raw)))
}

/// 보정된 페이지 번호 추출기.
#[derive(Debug, Clone, Copy)]
pub struct PageParam(pub PageRequest);

impl<S> FromRequestParts<S> for PageParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AdminError::Validation(rejection.body_text()))?;

        Ok(PageParam(PageRequest::new(query.page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};

    #[derive(Debug, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_accepts_valid_body() {
        let ValidatedJson(named) =
            ValidatedJson::<Named>::from_request(json_request(r#"{"name":"Admin"}"#), &())
                .await
                .unwrap();
        assert_eq!(named.name, "Admin");
    }

    #[tokio::test]
    async fn test_validated_json_rejects_rule_violation() {
        let err = ValidatedJson::<Named>::from_request(json_request(r#"{"name":""}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err.inner(), AdminError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validated_json_rejects_malformed_body() {
        let err = ValidatedJson::<Named>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err.inner(), AdminError::Validation(_)));
    }

    async fn page_of(uri: &str) -> Result<PageParam, ApiError> {
        let (mut parts, _) = HttpRequest::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        PageParam::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_page_param_defaults_and_clamps() {
        assert_eq!(page_of("/api/users").await.unwrap().0.page(), 1);
        assert_eq!(page_of("/api/users?page=3").await.unwrap().0.page(), 3);
        assert_eq!(page_of("/api/users?page=-4").await.unwrap().0.page(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_value_is_first_page() {
        assert_eq!(page_of("/api/users?page=").await.unwrap().0.page(), 1);
        assert_eq!(page_of("/api/orders?page=%20").await.unwrap().0.page(), 1);
    }

    #[tokio::test]
    async fn test_page_param_rejects_non_numeric() {
        let err = page_of("/api/users?page=abc").await.unwrap_err();
        assert!(matches!(err.inner(), AdminError::Validation(_)));
    }
}
