//! 문서 저장소 및 컬렉션 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - [`DocumentStore`] trait: 컬렉션 단위 동등 비교 필터 기반 문서 저장소
//! - PostgreSQL(JSONB) 구현 및 인메모리 구현
//! - 상품/주문/리뷰/사용자 컬렉션별 타입 저장소
//!
//! 저장소 핸들은 전역 싱글톤이 아니라 명시적으로 생성되어 주입됩니다.

pub mod error;
pub mod repository;
pub mod store;

pub use error::{DataError, Result};
pub use repository::{OrderRepository, ProductRepository, ReviewRepository, UserRepository};
pub use store::memory::MemoryDocumentStore;
pub use store::postgres::{Database, PgDocumentStore};
pub use store::{DocumentStore, SharedStore};
