//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → 환경 변수(`ADMIN__SECTION__KEY`) 순으로
//! 덮어쓰며 애플리케이션 설정을 구성합니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;

/// JWT 서명 키 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 파일 저장 설정
    pub storage: StorageConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HS256 서명 키. 반드시 외부에서 주입해야 합니다.
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
    /// 토큰 유효 시간 (시간)
    pub token_ttl_hours: i64,
    /// 토큰을 담는 쿠키 이름
    pub cookie_name: String,
    /// 쿠키 Secure 속성
    pub cookie_secure: bool,
    /// 회원가입 시 부여되는 역할 ID
    pub default_role_id: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            cookie_name: "jwt".to_string(),
            cookie_secure: false,
            default_role_id: 1,
        }
    }
}

/// 파일 저장 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// 이미지 업로드 디렉토리
    pub upload_dir: PathBuf,
    /// 주문 CSV 내보내기 경로
    pub export_path: PathBuf,
    /// 업로드 파일 URL 접두사
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            export_path: PathBuf::from("./csv/orders.csv"),
            public_base_url: "http://localhost:5000/api/uploads".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 필터 (예: "info,admin_api=debug"). `RUST_LOG`가 우선합니다.
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
            with_file: false,
        }
    }
}

/// 설정 검증 에러.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("auth.jwt_secret이 설정되지 않았습니다 (ADMIN__AUTH__JWT_SECRET)")]
    MissingJwtSecret,
    #[error("auth.jwt_secret은 최소 {MIN_JWT_SECRET_LEN}바이트여야 합니다")]
    WeakJwtSecret,
    #[error("auth.token_ttl_hours는 양수여야 합니다")]
    InvalidTokenTtl,
    #[error("database.url이 설정되지 않았습니다 (DATABASE_URL)")]
    MissingDatabaseUrl,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// `DATABASE_URL`은 `database.url`의 별칭으로 인식합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .add_source(config::Config::try_from(&defaults)?)
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("ADMIN")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 서버 시작 전 필수 값 검증.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingJwtSecret);
        }
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigValidationError::WeakJwtSecret);
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigValidationError::InvalidTokenTtl);
        }
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }
        Ok(())
    }
}
