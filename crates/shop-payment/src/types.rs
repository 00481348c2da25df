//! 결제 타입 및 trait 정의.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 생성된 payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// 대행사 측 intent ID
    pub id: String,
    /// 프론트엔드 결제 확인용 secret
    pub client_secret: String,
}

/// 결제 에러.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("잘못된 결제 금액: {0}")]
    InvalidAmount(Decimal),

    #[error("결제 대행사 요청 실패: {0}")]
    ProcessorFailed(String),

    #[error("잘못된 응답: {0}")]
    InvalidResponse(String),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// 결제 대행사 trait.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// 최소 화폐 단위 금액으로 payment intent를 생성합니다.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> PaymentResult<PaymentIntent>;

    /// 결제 통화.
    fn currency(&self) -> &str;

    /// 대행사 이름.
    fn name(&self) -> &str;
}

/// 주 화폐 단위 금액을 최소 단위(센트 등)로 변환합니다.
///
/// 최소 단위 미만은 은행원 반올림(half-even)합니다.
pub fn to_minor_units(price: Decimal) -> PaymentResult<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.round().to_i64())
        .ok_or(PaymentError::InvalidAmount(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec!(19.99)).unwrap(), 1999);
        assert_eq!(to_minor_units(dec!(250)).unwrap(), 25000);
        assert_eq!(to_minor_units(dec!(0.005)).unwrap(), 0);
        assert_eq!(to_minor_units(dec!(1.239)).unwrap(), 124);
        assert!(matches!(
            to_minor_units(Decimal::MAX),
            Err(PaymentError::InvalidAmount(_))
        ));
    }
}
