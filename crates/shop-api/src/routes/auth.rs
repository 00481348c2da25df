//! 로그인 endpoint.
//!
//! 요청 본문(JSON 객체)을 그대로 claims에 담아 세션 토큰을 발급합니다.
//! 자격 증명 확인은 하지 않습니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::metrics::record_token_issued;
use crate::state::AppState;

/// 토큰 발급 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// 세션 토큰 (`author: Bearer <token>`으로 전달)
    pub token: String,
}

/// 세션 토큰 발급.
///
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    responses(
        (status = 200, description = "토큰 발급", body = TokenResponse),
        (status = 422, description = "본문이 JSON 객체가 아님"),
        (status = 500, description = "토큰 서명 실패", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<Json<TokenResponse>> {
    let has_email = payload.get("email").is_some_and(Value::is_string);

    let token = state.token_keys.issue(payload).map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse::new("TOKEN_ERROR", e.to_string())),
        )
    })?;

    record_token_issued();
    debug!(has_email, "Session token issued");

    Ok(Json(TokenResponse { token }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };
    use tower::ServiceExt;

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let state = Arc::new(create_test_state());
        let app = auth_router().with_state(state.clone());

        let response = app
            .oneshot(login_request(r#"{"email":"a@x.com","name":"Ann"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let TokenResponse { token } = serde_json::from_slice(&body).unwrap();

        let claims = state.token_keys.decode(&token).unwrap();
        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.identity.get("name"), Some(&Value::from("Ann")));
    }

    #[tokio::test]
    async fn test_login_rejects_non_object_body() {
        let app = auth_router().with_state(Arc::new(create_test_state()));

        let response = app.oneshot(login_request(r#"["a@x.com"]"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
