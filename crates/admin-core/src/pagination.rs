//! 목록 엔드포인트용 페이지네이션.
//!
//! 페이지 크기는 15로 고정되어 있습니다. 1보다 작은 페이지 번호는 1로 보정되므로
//! offset이 음수가 되는 일은 없습니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 페이지당 항목 수.
pub const PAGE_SIZE: i64 = 15;

/// 보정된 페이지 요청.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageRequest {
    /// 페이지 번호로 생성 (최소 1).
    pub fn new(page: i64) -> Self {
        Self { page: page.max(1) }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

/// 페이지 메타데이터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PageMeta {
    /// 전체 항목 수
    pub total: i64,
    /// 현재 페이지 (1부터)
    pub page: i64,
    /// 마지막 페이지. 항목이 없으면 0
    pub last_page: i64,
}

impl PageMeta {
    pub fn new(total: i64, request: PageRequest) -> Self {
        let total = total.max(0);
        Self {
            total,
            page: request.page(),
            last_page: (total + PAGE_SIZE - 1) / PAGE_SIZE,
        }
    }
}

/// 페이지 단위 응답: `{"data": [...], "meta": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// 항목 타입 변환.
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// 페이지 단위로 읽을 수 있는 데이터 원본.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Error: Send;

    /// 전체 항목 수.
    async fn count(&self) -> Result<i64, Self::Error>;

    /// `offset`부터 최대 `limit`개 항목.
    async fn take(&self, limit: i64, offset: i64) -> Result<Vec<Self::Item>, Self::Error>;
}

#[async_trait]
impl<T> PageSource for Vec<T>
where
    T: Clone + Send + Sync,
{
    type Item = T;
    type Error = std::convert::Infallible;

    async fn count(&self) -> Result<i64, Self::Error> {
        Ok(i64::try_from(self.len()).unwrap_or(i64::MAX))
    }

    async fn take(&self, limit: i64, offset: i64) -> Result<Vec<T>, Self::Error> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.iter().skip(offset).take(limit).cloned().collect())
    }
}

/// 주어진 페이지를 읽어 메타데이터와 함께 반환.
pub async fn paginate<S>(source: &S, page: i64) -> Result<Paginated<S::Item>, S::Error>
where
    S: PageSource + ?Sized,
{
    let request = PageRequest::new(page);
    let data = source.take(request.limit(), request.offset()).await?;
    let total = source.count().await?;

    Ok(Paginated {
        data,
        meta: PageMeta::new(total, request),
    })
}
