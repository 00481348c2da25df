//! Axum용 세션 토큰 검증 추출기.
//!
//! 보호된 라우트는 `author: <scheme> <token>` 헤더를 요구합니다.
//! scheme 단어는 검사하지 않고 공백으로 나눈 두 번째 조각을 토큰으로 사용합니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::{Claims, TokenKeys};
use crate::metrics::record_auth_rejection;

/// 세션 토큰 헤더 이름.
pub const AUTH_HEADER: &str = "author";

/// 인증 실패 응답 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthErrorBody {
    /// 실패 태그 ("NoToken" | "WrongToken")
    pub name: String,
    /// 메시지
    pub message: String,
}

/// 인증 에러.
///
/// `NotOwner`는 외부에는 `WrongToken`과 같은 응답으로 보입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized Access")]
    NoToken,
    #[error("Forbidden Access")]
    WrongToken,
    #[error("Forbidden Access")]
    NotOwner,
}

impl AuthError {
    /// 외부 응답 태그.
    pub fn tag(&self) -> &'static str {
        match self {
            AuthError::NoToken => "NoToken",
            AuthError::WrongToken | AuthError::NotOwner => "WrongToken",
        }
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::NoToken => StatusCode::UNAUTHORIZED,
            AuthError::WrongToken | AuthError::NotOwner => StatusCode::FORBIDDEN,
        }
    }

    /// 메트릭 라벨용 내부 사유.
    fn reason(&self) -> &'static str {
        match self {
            AuthError::NoToken => "no_token",
            AuthError::WrongToken => "wrong_token",
            AuthError::NotOwner => "not_owner",
        }
    }

    /// 응답 본문.
    pub fn body(&self) -> AuthErrorBody {
        AuthErrorBody {
            name: self.tag().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        record_auth_rejection(self.tag(), self.reason());
        (self.status(), Json(self.body())).into_response()
    }
}

/// 헤더 값에서 토큰을 검증하고 claims를 반환합니다.
///
/// - 헤더 없음 → `NoToken`
/// - 두 번째 조각 없음, 서명 불일치, 형식 오류, 만료 → `WrongToken`
pub fn verify(header: Option<&HeaderValue>, keys: &TokenKeys) -> Result<Claims, AuthError> {
    let header = header.ok_or(AuthError::NoToken)?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split(' ').nth(1))
        .ok_or(AuthError::WrongToken)?;

    keys.decode(token).map_err(|e| {
        debug!(error = %e, "Session token rejected");
        AuthError::WrongToken
    })
}

/// 요청한 이메일이 토큰 소유자의 것인지 확인합니다.
///
/// 대소문자를 포함해 정확히 일치해야 합니다. claims에 문자열 `email`이
/// 없으면 불일치로 처리합니다.
pub fn authorize_owner_read(claims: &Claims, requested_email: &str) -> Result<(), AuthError> {
    if claims.email() == Some(requested_email) {
        Ok(())
    } else {
        warn!("Order read denied: token identity does not own requested email");
        Err(AuthError::NotOwner)
    }
}

/// 세션 토큰 인증 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
///     format!("Hello, {:?}!", claims.email())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl<S> FromRequestParts<S> for JwtAuth
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = TokenKeys::from_ref(state);
        verify(parts.headers.get(AUTH_HEADER), &keys).map(JwtAuth)
    }
}
