//! 세션 토큰 발급 및 검증.
//!
//! 로그인 페이로드를 그대로 claims에 담고 `iat`/`exp`만 추가합니다.
//! 서버에는 아무것도 저장하지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shop_core::AuthConfig;

/// 세션 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// 로그인 시 전달된 호출자 정보 (그대로 보존)
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 로그인 페이로드로 Claims 생성.
    ///
    /// 페이로드에 `iat`/`exp`가 있으면 발급 시각 값으로 덮어씁니다.
    pub fn new(mut identity: Map<String, Value>, ttl: Duration) -> Self {
        identity.remove("iat");
        identity.remove("exp");

        let now = Utc::now();
        Self {
            identity,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// 호출자 이메일 (문자열일 때만).
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
    #[error("서명이 일치하지 않습니다")]
    InvalidSignature,
}

/// 서명/검증 키와 토큰 유효 시간.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    /// 공유 시크릿으로 키 생성 (HS256).
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// 인증 설정에서 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.token_secret, Duration::hours(config.token_ttl_hours))
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 로그인 페이로드로 토큰 발급.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String, JwtError> {
        self.issue_with_ttl(payload, self.ttl)
    }

    /// 지정한 유효 시간으로 토큰 발급.
    ///
    /// 음수 유효 시간이면 이미 만료된 토큰이 만들어집니다.
    pub fn issue_with_ttl(
        &self,
        payload: Map<String, Value>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(payload, ttl);
        encode(&Header::default(), &claims, &self.encoding).map_err(JwtError::from)
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 만료 시각은 여유 시간 없이 검사합니다. 로그인 페이로드에 들어 있는
    /// `aud`/`iss`/`sub`/`nbf`는 일반 필드로 취급하며 검사하지 않습니다.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                _ => JwtError::DecodingError,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::new(&SecretString::new(secret.into()), Duration::hours(10))
    }

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_issue_and_decode() {
        let keys = keys(TEST_SECRET);
        let token = keys
            .issue(payload(json!({"email": "a@x.com", "name": "Ann"})))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.identity.get("name"), Some(&json!("Ann")));
        assert_eq!(claims.exp - claims.iat, 10 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_reserved_keys_are_overwritten() {
        let keys = keys(TEST_SECRET);
        let token = keys
            .issue(payload(json!({"email": "a@x.com", "exp": 1, "iat": 1})))
            .unwrap();

        let claims = keys.decode(&token).unwrap();
        assert!(claims.exp > 1);
        assert!(!claims.identity.contains_key("exp"));
        assert!(!claims.identity.contains_key("iat"));
    }

    #[test]
    fn test_registered_claim_names_in_payload_are_not_validated() {
        let keys = keys(TEST_SECRET);
        let identity = payload(json!({
            "email": "a@x.com",
            "aud": "shop",
            "iss": "someone",
            "sub": "42",
            "nbf": 9_999_999_999i64,
            "jti": "abc"
        }));
        let token = keys.issue(identity.clone()).unwrap();

        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.identity, identity);
    }

    #[test]
    fn test_expired_token() {
        let keys = keys(TEST_SECRET);
        let token = keys
            .issue_with_ttl(payload(json!({"email": "a@x.com"})), Duration::minutes(-5))
            .unwrap();

        assert!(matches!(keys.decode(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let result = keys(TEST_SECRET).decode("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = keys(TEST_SECRET)
            .issue(payload(json!({"email": "a@x.com"})))
            .unwrap();

        let result = keys("wrong-secret-key-for-testing-minimum-32-chars").decode(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_email_must_be_string() {
        let claims = Claims::new(payload(json!({"email": 42})), Duration::hours(1));
        assert_eq!(claims.email(), None);
    }
}
