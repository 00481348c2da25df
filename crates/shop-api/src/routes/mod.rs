//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서버 동작 확인
//! - `/health`, `/health/ready` - 헬스 체크
//! - `/login` - 세션 토큰 발급
//! - `/tools`, `/products`, `/product/{id}` - 상품
//! - `/order`, `/orders`, `/myOrders`, `/order/{id}` - 주문
//! - `/review` - 리뷰
//! - `/user`, `/user/{email}`, `/userAdmin/{email}`, `/admin/{email}` - 사용자 프로필
//! - `/payment` - payment intent 생성

pub mod auth;
pub mod health;
pub mod orders;
pub mod payment;
pub mod products;
pub mod reviews;
pub mod users;

pub use auth::{auth_router, TokenResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use orders::{orders_router, MyOrdersQuery};
pub use payment::{payment_router, PaymentRequest, PaymentResponse};
pub use products::products_router;
pub use reviews::reviews_router;
pub use users::{users_router, AdminResponse};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        .nest("/health", health_router())
        .merge(auth_router())
        .merge(products_router())
        .merge(orders_router())
        .merge(reviews_router())
        .merge(users_router())
        .merge(payment_router())
}
