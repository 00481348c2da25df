//! 사용자 프로필 문서.
//!
//! 프로필은 `email`로 식별되며, 나머지 필드는 upsert 시 그대로 병합됩니다.

use serde_json::Value;

use super::Document;

/// 관리자 역할 값.
pub const ADMIN_ROLE: &str = "admin";

/// 역할 필드.
pub const ROLE_FIELD: &str = "role";

/// 프로필이 관리자 역할인지 확인합니다.
pub fn is_admin(profile: &Document) -> bool {
    profile.get(ROLE_FIELD).and_then(Value::as_str) == Some(ADMIN_ROLE)
}
