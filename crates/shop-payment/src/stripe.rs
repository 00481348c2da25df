//! Stripe payment intent 클라이언트.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use shop_core::PaymentConfig;
use tracing::{debug, error, info};

use crate::types::{PaymentError, PaymentIntent, PaymentProcessor, PaymentResult};

/// Stripe 연동 설정.
#[derive(Debug)]
pub struct StripeConfig {
    /// 시크릿 키 (`sk_...`)
    pub secret_key: SecretString,
    /// API 기본 URL
    pub base_url: String,
    /// 결제 통화
    pub currency: String,
}

impl StripeConfig {
    /// 새 Stripe 설정을 생성합니다.
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            base_url: "https://api.stripe.com".to_string(),
            currency: "usd".to_string(),
        }
    }

    /// API 기본 URL을 변경합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 애플리케이션 결제 설정에서 생성합니다.
    ///
    /// 시크릿 키가 없으면 `None`을 반환합니다.
    pub fn from_config(config: &PaymentConfig) -> Option<Self> {
        let secret_key = config.secret_key.as_ref()?;
        Some(Self {
            secret_key: SecretString::new(secret_key.expose_secret().into()),
            base_url: config.base_url.clone(),
            currency: config.currency.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

/// Stripe 클라이언트.
pub struct StripeClient {
    config: StripeConfig,
    client: reqwest::Client,
}

impl StripeClient {
    /// 새 Stripe 클라이언트를 생성합니다.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> PaymentResult<PaymentIntent> {
        let url = format!(
            "{}/v1/payment_intents",
            self.config.base_url.trim_end_matches('/')
        );

        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        debug!(amount_minor, currency, "Creating Stripe payment intent");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "Stripe payment intent request failed: {}", message);
            return Err(PaymentError::ProcessorFailed(format!(
                "HTTP {}: {}",
                status, message
            )));
        }

        let intent: PaymentIntentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::InvalidResponse("missing client_secret".to_string())
        })?;

        info!(intent_id = %intent.id, "Stripe payment intent created");

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> StripeClient {
        StripeClient::new(
            StripeConfig::new(SecretString::new("sk_test_123".into())).with_base_url(server.url()),
        )
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/payment_intents")
            .match_header("authorization", "Bearer sk_test_123")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("amount".into(), "1999".into()),
                Matcher::UrlEncoded("currency".into(), "usd".into()),
                Matcher::UrlEncoded("payment_method_types[]".into(), "card".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"pi_1","client_secret":"pi_1_secret_abc","amount":1999}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let intent = client.create_payment_intent(1999, "usd").await.unwrap();

        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.client_secret, "pi_1_secret_abc");
        assert_eq!(client.currency(), "usd");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_processor_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/payment_intents")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Amount must be at least $0.50 usd"}}"#)
            .create_async()
            .await;

        let result = client_for(&server).create_payment_intent(10, "usd").await;

        match result {
            Err(PaymentError::ProcessorFailed(message)) => {
                assert!(message.contains("400"));
                assert!(message.contains("at least $0.50"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_client_secret_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/payment_intents")
            .with_status(200)
            .with_body(r#"{"id":"pi_2"}"#)
            .create_async()
            .await;

        let result = client_for(&server).create_payment_intent(500, "usd").await;
        assert!(matches!(result, Err(PaymentError::InvalidResponse(_))));
    }

    #[test]
    fn test_from_config_requires_secret() {
        let config = PaymentConfig::default();
        assert!(StripeConfig::from_config(&config).is_none());

        let config = PaymentConfig {
            secret_key: Some(SecretString::new("sk_live_x".into())),
            currency: "bdt".to_string(),
            ..Default::default()
        };
        let stripe = StripeConfig::from_config(&config).unwrap();
        assert_eq!(stripe.currency, "bdt");
        assert_eq!(stripe.base_url, "https://api.stripe.com");
    }
}
