//! 페이지 단위 접근 권한 모델.
//!
//! 권한 이름(`view-orders`, `edit_users` 등)을 `(접근 수준, 리소스)` 쌍으로 파싱하고,
//! 요청된 `(리소스, 동작)`이 허용되는지 판정합니다.
//!
//! # 판정 규칙
//!
//! | 보유 권한        | Read | Write |
//! |------------------|------|-------|
//! | `view-<page>`    | 허용 | 거부  |
//! | `edit-<page>`    | 허용 | 허용  |
//! | 없음             | 거부 | 거부  |

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 권한으로 보호되는 리소스 페이지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Resource {
    /// 사용자 관리
    Users,
    /// 역할 관리
    Roles,
    /// 주문 조회/내보내기/차트
    Orders,
    /// 이미지 업로드
    Images,
}

impl Resource {
    /// 모든 리소스.
    pub const ALL: [Resource; 4] = [
        Resource::Users,
        Resource::Roles,
        Resource::Orders,
        Resource::Images,
    ];

    /// 페이지 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Orders => "orders",
            Resource::Images => "images",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown resource: {}", s))
    }
}

/// 요청 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// 조회
    Read,
    /// 생성/수정/삭제
    Write,
}

impl Action {
    /// HTTP 메서드를 동작으로 변환.
    ///
    /// GET/HEAD만 Read이며, 나머지 메서드는 모두 Write입니다.
    pub fn from_method(method: &http::Method) -> Self {
        if *method == http::Method::GET || *method == http::Method::HEAD {
            Action::Read
        } else {
            Action::Write
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 권한의 접근 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// 읽기 전용
    View,
    /// 읽기 + 쓰기
    Edit,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::View => "view",
            AccessLevel::Edit => "edit",
        }
    }

    /// 이 수준이 주어진 동작을 허용하는지 확인.
    pub fn permits(&self, action: Action) -> bool {
        match (self, action) {
            (AccessLevel::Edit, _) => true,
            (AccessLevel::View, Action::Read) => true,
            (AccessLevel::View, Action::Write) => false,
        }
    }
}

/// 하나의 권한: 특정 리소스에 대한 접근 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub level: AccessLevel,
    pub resource: Resource,
}

impl Capability {
    pub fn new(level: AccessLevel, resource: Resource) -> Self {
        Self { level, resource }
    }

    /// 저장된 권한 이름 파싱.
    ///
    /// `view-users`, `view_users`, `viewusers` 형식을 모두 인식합니다.
    /// 마지막 형식은 구분자 없이 접두사와 페이지 이름을 이어 붙인 기존 데이터용입니다.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let (level, rest) = if let Some(rest) = name.strip_prefix("view") {
            (AccessLevel::View, rest)
        } else if let Some(rest) = name.strip_prefix("edit") {
            (AccessLevel::Edit, rest)
        } else {
            return None;
        };

        let page = rest
            .strip_prefix('-')
            .or_else(|| rest.strip_prefix('_'))
            .unwrap_or(rest);

        page.parse::<Resource>()
            .ok()
            .map(|resource| Capability::new(level, resource))
    }

    /// 정규화된 권한 이름 (`view-orders`).
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.level.as_str(), self.resource.as_str())
    }
}

/// 역할이 보유한 권한 집합.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grants {
    capabilities: HashSet<Capability>,
}

impl Grants {
    /// 권한 이름 목록에서 생성.
    ///
    /// 해석할 수 없는 이름은 아무 권한도 부여하지 않고 무시됩니다.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let capabilities = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let parsed = Capability::parse(name);
                if parsed.is_none() {
                    tracing::debug!(permission = %name, "Ignoring unrecognised permission name");
                }
                parsed
            })
            .collect();

        Self { capabilities }
    }

    /// 요청된 리소스/동작이 허용되는지 판정.
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.resource == resource && cap.level.permits(action))
    }

    /// 보유한 권한 목록.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl FromIterator<Capability> for Grants {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}
