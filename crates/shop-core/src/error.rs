//! 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// JSON 객체가 아닌 문서
    #[error("문서는 JSON 객체여야 합니다")]
    NotAnObject,
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
