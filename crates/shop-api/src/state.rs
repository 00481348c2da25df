//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 문서 저장소 핸들은 전역 싱글톤이 아니라 생성 시 주입됩니다.

use std::sync::Arc;

use axum::extract::FromRef;
use shop_data::{OrderRepository, ProductRepository, ReviewRepository, SharedStore, UserRepository};
use shop_payment::PaymentProcessor;

use crate::auth::TokenKeys;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 문서 저장소 (PostgreSQL 또는 인메모리)
    pub store: SharedStore,

    /// 상품 컬렉션
    pub products: ProductRepository,

    /// 주문 컬렉션
    pub orders: OrderRepository,

    /// 리뷰 컬렉션
    pub reviews: ReviewRepository,

    /// 사용자 프로필 컬렉션
    pub users: UserRepository,

    /// 세션 토큰 발급/검증 키
    pub token_keys: TokenKeys,

    /// 결제 대행사 (시크릿 키 미설정 시 None)
    pub payment: Option<Arc<dyn PaymentProcessor>>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(store: SharedStore, token_keys: TokenKeys) -> Self {
        Self {
            products: ProductRepository::new(store.clone()),
            orders: OrderRepository::new(store.clone()),
            reviews: ReviewRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            store,
            token_keys,
            payment: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 결제 대행사 설정.
    pub fn with_payment(mut self, processor: Arc<dyn PaymentProcessor>) -> Self {
        self.payment = Some(processor);
        self
    }

    /// 결제 대행사 설정 여부 확인.
    pub fn has_payment(&self) -> bool {
        self.payment.is_some()
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 문서 저장소 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}

impl FromRef<Arc<AppState>> for TokenKeys {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.token_keys.clone()
    }
}

/// 테스트용 토큰 시크릿.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_TOKEN_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성.
///
/// 인메모리 문서 저장소와 10시간 유효 토큰 키를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;
    use shop_data::MemoryDocumentStore;

    let keys = TokenKeys::new(
        &SecretString::new(TEST_TOKEN_SECRET.into()),
        chrono::Duration::hours(10),
    );
    AppState::new(Arc::new(MemoryDocumentStore::new()), keys)
}
