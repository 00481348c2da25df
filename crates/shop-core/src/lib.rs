//! # Shop Core
//!
//! 공구 쇼핑몰 백엔드의 핵심 도메인 문서 및 공통 인프라를 제공합니다.
//!
//! - 문서 표현, 주문 결제 기록, 관리자 역할 판단
//! - 문서 저장소 쓰기 결과 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
