//! 인증 및 소유권 확인.
//!
//! # 구성 요소
//!
//! - [`Claims`]: 세션 토큰 페이로드 (로그인 페이로드 + `iat`/`exp`)
//! - [`TokenKeys`]: 토큰 발급/검증 키
//! - [`JwtAuth`]: `author` 헤더를 검증하는 Axum 추출기
//! - [`authorize_owner_read`]: 주문 조회 소유권 확인
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn my_orders(
//!     JwtAuth(claims): JwtAuth,
//!     Query(query): Query<MyOrdersQuery>,
//! ) -> Result<Json<Vec<Document>>, Response> {
//!     authorize_owner_read(&claims, &query.email).map_err(IntoResponse::into_response)?;
//!     // ...
//! }
//! ```

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtError, TokenKeys};
pub use middleware::{
    authorize_owner_read, verify, AuthError, AuthErrorBody, JwtAuth, AUTH_HEADER,
};
