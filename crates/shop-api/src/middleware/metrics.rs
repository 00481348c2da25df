//! HTTP 요청 metrics middleware.

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;

use crate::auth::AUTH_HEADER;
use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 요청의 인증 헤더 포함 여부 라벨.
///
/// 헤더 값은 검증하지 않습니다. 검증 결과는 `auth_rejections_total`에 따로 집계됩니다.
fn auth_label(headers: &HeaderMap) -> &'static str {
    if headers.contains_key(AUTH_HEADER) {
        "token"
    } else {
        "anonymous"
    }
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// - `http_requests_total`: 총 요청 수 (method, path, auth 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
///
/// 경로의 주문 ID와 이메일은 라벨에 남기지 않습니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    record_http_request(&method, &path, auth_label(request.headers()));

    let response = next.run(request).await;

    record_http_response(&method, &path, response.status().as_u16());
    record_http_duration(&method, &path, start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtAuth, TokenKeys};
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use chrono::Duration;
    use secrecy::SecretString;
    use tower::ServiceExt;

    async fn protected(JwtAuth(claims): JwtAuth) -> String {
        claims.email().unwrap_or_default().to_string()
    }

    fn guarded_app() -> Router {
        let keys = TokenKeys::new(
            &SecretString::new("metrics-layer-secret".into()),
            Duration::hours(1),
        );
        Router::new()
            .route("/order/{id}", get(protected))
            .layer(middleware::from_fn(metrics_layer))
            .with_state(keys)
    }

    #[test]
    fn test_auth_label() {
        let mut headers = HeaderMap::new();
        assert_eq!(auth_label(&headers), "anonymous");

        headers.insert(AUTH_HEADER, HeaderValue::from_static("Bearer x"));
        assert_eq!(auth_label(&headers), "token");
    }

    #[tokio::test]
    async fn test_rejection_passes_through_unchanged() {
        let response = guarded_app()
            .oneshot(
                Request::builder()
                    .uri("/order/123e4567-e89b-12d3-a456-426614174000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            &body[..],
            br#"{"name":"NoToken","message":"Unauthorized Access"}"#
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_counted_as_404() {
        let response = guarded_app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header(AUTH_HEADER, "Bearer x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
