//! 통합 API 에러 응답 타입.
//!
//! 인증 실패(`{name, message}`)를 제외한 모든 엔드포인트 에러는
//! 이 모듈의 `ApiErrorResponse` 형식을 사용합니다.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shop_data::DataError;
use shop_payment::PaymentError;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "product not found: 6f1c...",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DB_ERROR", "NOT_FOUND", "PAYMENT_FAILED")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// ```
    /// use shop_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("NOT_FOUND", "order not found");
    /// assert_eq!(error.code, "NOT_FOUND");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러 에러 (상태 코드 + 에러 본문).
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 문서 저장소 에러를 API 에러로 변환합니다.
///
/// 중복 ID는 409, 잘못된 문서는 400, 나머지는 500 `DB_ERROR`입니다.
pub fn db_error(err: DataError) -> ApiError {
    let (status, code) = match &err {
        DataError::DuplicateError(_) => (StatusCode::CONFLICT, "DUPLICATE"),
        DataError::InvalidData(_) => (StatusCode::BAD_REQUEST, "INVALID_DOCUMENT"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "Document store operation failed");
    }

    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}

/// 문서 없음 에러.
pub fn not_found(kind: &str, key: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::new(
            "NOT_FOUND",
            format!("{} not found: {}", kind, key),
        )),
    )
}

/// 결제 에러를 API 에러로 변환합니다.
pub fn payment_error(err: PaymentError) -> ApiError {
    let (status, code) = match &err {
        PaymentError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
        _ => (StatusCode::BAD_GATEWAY, "PAYMENT_FAILED"),
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "Payment intent creation failed");
    }

    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}
