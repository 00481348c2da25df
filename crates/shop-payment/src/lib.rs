//! # Shop Payment
//!
//! 결제 대행사 연동.
//!
//! 결제 금액으로 payment intent를 생성하고, 프론트엔드가 결제를 완료하는 데
//! 필요한 client secret을 반환합니다. 결제 대행사의 내부 동작은 다루지 않습니다.
//!
//! 지원 대행사:
//! - Stripe (`/v1/payment_intents`)

pub mod stripe;
pub mod types;

pub use stripe::*;
pub use types::*;
