//! 컬렉션별 저장소.
//!
//! 각 저장소는 주입된 [`SharedStore`](crate::SharedStore) 핸들을 보유하며,
//! 컬렉션 이름과 필터 구성만 담당합니다. 문서 본문은 해석하지 않습니다.

pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
