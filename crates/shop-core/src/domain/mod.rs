//! 쇼핑몰 도메인 문서.
//!
//! 모든 문서는 문서 저장소에 JSON 객체로 저장됩니다. 상품, 리뷰, 프로필
//! 본문은 해석하지 않고 클라이언트가 보낸 그대로 보존합니다.

pub mod document;
pub mod order;
pub mod user;

pub use document::*;
pub use order::*;
pub use user::*;
