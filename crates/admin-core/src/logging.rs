//! tracing을 사용한 로깅 인프라.
//!
//! 출력 형식은 `logging.format`으로 고릅니다:
//! - **pretty**: 개발용 여러 줄 형식
//! - **json**: 로그 집계용, 이벤트 필드를 최상위로 펼칩니다
//! - **compact**: 한 줄 형식

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// 기본 필터. 요청 추적 로그(tower_http)는 info 이상만 남깁니다.
pub const DEFAULT_LOG_FILTER: &str = "admin_api=info,admin_core=info,tower_http=info";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// 로깅 초기화 에러.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("잘못된 로그 필터: {0}")]
    Filter(#[from] ParseError),
    #[error("로깅이 이미 초기화되었습니다: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// `RUST_LOG`가 있으면 그 값을, 없으면 설정의 필터를 사용합니다.
fn env_filter(settings: &LoggingConfig) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level),
    }
}

fn fmt_layer(settings: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_file(settings.with_file)
        .with_line_number(settings.with_file);

    match settings.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// 전역 subscriber를 설치합니다. 프로세스당 한 번만 호출할 수 있습니다.
///
/// ```no_run
/// use admin_core::{init_logging, LogFormat, LoggingConfig};
///
/// let settings = LoggingConfig {
///     format: LogFormat::Json,
///     ..Default::default()
/// };
/// init_logging(&settings).expect("logging");
/// ```
pub fn init_logging(settings: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = env_filter(settings)?;

    tracing_subscriber::registry()
        .with(fmt_layer(settings))
        .with(filter)
        .try_init()?;

    tracing::info!(
        format = ?settings.format,
        level = %settings.level,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        format: LogFormat,
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let parsed: Wrapper = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
        assert!(serde_json::from_str::<Wrapper>(r#"{"format":"xml"}"#).is_err());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let settings = LoggingConfig {
            level: "admin_api=notalevel".to_string(),
            ..Default::default()
        };
        assert!(EnvFilter::try_new(&settings.level).is_err());
    }

    #[test]
    fn test_default_settings_are_pretty() {
        let settings = LoggingConfig::default();
        assert_eq!(settings.format, LogFormat::Pretty);
        assert_eq!(settings.level, DEFAULT_LOG_FILTER);
        assert!(!settings.with_file);
    }
}
