//! 결제 endpoint.
//!
//! 주 화폐 단위 금액을 받아 결제 대행사에 payment intent를 만들고
//! 프론트엔드가 사용할 client secret을 반환합니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_payment::to_minor_units;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthErrorBody, JwtAuth};
use crate::error::{payment_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 결제 요청.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// 결제 금액 (주 화폐 단위)
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// 결제 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// payment intent client secret
    pub client_secret: String,
}

/// payment intent 생성.
///
/// POST /payment
#[utoipa::path(
    post,
    path = "/payment",
    tag = "payment",
    request_body = PaymentRequest,
    security(("author" = [])),
    responses(
        (status = 200, description = "payment intent 생성", body = PaymentResponse),
        (status = 400, description = "변환할 수 없는 금액", body = ApiErrorResponse),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody),
        (status = 502, description = "결제 대행사 오류", body = ApiErrorResponse),
        (status = 503, description = "결제 미설정", body = ApiErrorResponse)
    )
)]
pub async fn create_payment_intent(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<Json<PaymentResponse>> {
    let processor = state.payment.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiErrorResponse::new(
                "PAYMENT_NOT_CONFIGURED",
                "payment processor is not configured",
            )),
        )
    })?;

    let amount = to_minor_units(request.price).map_err(payment_error)?;
    let intent = processor
        .create_payment_intent(amount, processor.currency())
        .await
        .map_err(payment_error)?;

    info!(
        processor = processor.name(),
        intent_id = %intent.id,
        amount,
        "Payment intent created"
    );

    Ok(Json(PaymentResponse {
        client_secret: intent.client_secret,
    }))
}

/// 결제 라우터 생성.
pub fn payment_router() -> Router<Arc<AppState>> {
    Router::new().route("/payment", post(create_payment_intent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };
    use serde_json::{json, Map, Value};
    use shop_payment::{PaymentError, PaymentIntent, PaymentProcessor, PaymentResult};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// 요청 금액을 기록하는 테스트용 결제 대행사.
    #[derive(Default)]
    struct RecordingProcessor {
        amounts: Mutex<Vec<i64>>,
        fail: bool,
    }

    #[async_trait]
    impl PaymentProcessor for RecordingProcessor {
        async fn create_payment_intent(
            &self,
            amount_minor: i64,
            _currency: &str,
        ) -> PaymentResult<PaymentIntent> {
            if self.fail {
                return Err(PaymentError::ProcessorFailed("card_declined".to_string()));
            }
            self.amounts.lock().unwrap().push(amount_minor);
            Ok(PaymentIntent {
                id: "pi_test".to_string(),
                client_secret: "pi_test_secret".to_string(),
            })
        }

        fn currency(&self) -> &str {
            "usd"
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn payment_request(state: &AppState, body: &str) -> Request<Body> {
        let mut identity = Map::new();
        identity.insert("email".to_string(), json!("a@x.com"));
        let token = state.token_keys.issue(identity).unwrap();

        Request::builder()
            .method("POST")
            .uri("/payment")
            .header("author", format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_payment_returns_client_secret() {
        let processor = Arc::new(RecordingProcessor::default());
        let state = Arc::new(create_test_state().with_payment(processor.clone()));
        let app = payment_router().with_state(state.clone());

        let response = app
            .oneshot(payment_request(&state, r#"{"price":125.5}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"clientSecret": "pi_test_secret"})
        );
        assert_eq!(*processor.amounts.lock().unwrap(), vec![12550]);
    }

    #[tokio::test]
    async fn test_processor_failure_is_bad_gateway() {
        let processor = Arc::new(RecordingProcessor {
            fail: true,
            ..Default::default()
        });
        let state = Arc::new(create_test_state().with_payment(processor));
        let app = payment_router().with_state(state.clone());

        let response = app
            .oneshot(payment_request(&state, r#"{"price":10}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["code"], "PAYMENT_FAILED");
    }

    #[tokio::test]
    async fn test_unconfigured_payment_is_unavailable() {
        let state = Arc::new(create_test_state());
        let app = payment_router().with_state(state.clone());

        let response = app
            .oneshot(payment_request(&state, r#"{"price":10}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_payment_requires_token() {
        let state = Arc::new(create_test_state().with_payment(Arc::new(RecordingProcessor::default())));
        let app = payment_router().with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payment")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"price":10}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
