//! 문서 저장소 추상화.
//!
//! 필터는 JSON 객체이며 최상위 필드 단위의 정확한 동등 비교로 해석됩니다.
//! 정규화(대소문자 무시 등)는 하지 않습니다.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shop_core::{DeleteResult, Document, InsertResult, UpdateResult, ID_FIELD};

use crate::error::{DataError, Result};

/// 공유 문서 저장소 핸들.
pub type SharedStore = Arc<dyn DocumentStore>;

/// 컬렉션 기반 문서 저장소.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 필터와 일치하는 모든 문서를 삽입 순서대로 반환합니다.
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>>;

    /// 필터와 일치하는 첫 번째 문서를 반환합니다.
    async fn find_one(&self, collection: &str, filter: &Document) -> Result<Option<Document>>;

    /// 문서를 삽입합니다. `_id`가 없으면 새로 발급합니다.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult>;

    /// 첫 번째 일치 문서에 `set` 필드를 병합합니다.
    ///
    /// 일치 문서가 없고 `upsert`이면 필터 필드와 `set`으로 새 문서를 만듭니다.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult>;

    /// 첫 번째 일치 문서를 삭제합니다.
    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<DeleteResult>;

    /// 저장소 연결 상태 확인.
    async fn ping(&self) -> Result<()>;

    /// 백엔드 이름 (로그/헬스 체크용).
    fn backend(&self) -> &'static str;
}

/// 문서가 필터의 모든 필드와 정확히 일치하는지 확인합니다.
pub fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// 문서의 `_id`를 확인하고, 없으면 새 UUID를 발급합니다.
pub fn ensure_id(document: &mut Document) -> Result<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(DataError::InvalidData(format!(
            "_id must be a string, got {}",
            other
        ))),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
    }
}

/// `set` 필드를 문서에 병합하고 변경 여부를 반환합니다.
///
/// `_id`는 변경할 수 없으므로 무시합니다.
pub fn apply_set(document: &mut Document, set: &Document) -> bool {
    let mut modified = false;
    for (key, value) in set {
        if key == ID_FIELD {
            continue;
        }
        if document.get(key) != Some(value) {
            document.insert(key.clone(), value.clone());
            modified = true;
        }
    }
    modified
}

/// upsert 시 새 문서의 초기 내용 (필터 필드 + set 필드).
pub fn upsert_seed(filter: &Document, set: &Document) -> Document {
    let mut seed = filter.clone();
    apply_set(&mut seed, set);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_matches_is_exact() {
        let order = doc(json!({"email": "x@y.com", "paid": false}));

        assert!(matches(&order, &doc(json!({"email": "x@y.com"}))));
        assert!(matches(&order, &doc(json!({}))));
        assert!(!matches(&order, &doc(json!({"email": "X@y.com"}))));
        assert!(!matches(&order, &doc(json!({"email": "x@y.com", "paid": true}))));
        assert!(!matches(&order, &doc(json!({"missing": null}))));
    }

    #[test]
    fn test_ensure_id() {
        let mut with_id = doc(json!({"_id": "abc"}));
        assert_eq!(ensure_id(&mut with_id).unwrap(), "abc");

        let mut without_id = doc(json!({"name": "saw"}));
        let id = ensure_id(&mut without_id).unwrap();
        assert_eq!(without_id.get(ID_FIELD), Some(&json!(id)));

        let mut numeric = doc(json!({"_id": 7}));
        assert!(matches!(
            ensure_id(&mut numeric),
            Err(DataError::InvalidData(_))
        ));
    }

    #[test]
    fn test_apply_set_reports_modification() {
        let mut user = doc(json!({"_id": "u1", "email": "a@x.com"}));

        assert!(apply_set(&mut user, &doc(json!({"role": "admin", "_id": "other"}))));
        assert_eq!(user.get("role"), Some(&json!("admin")));
        assert_eq!(user.get(ID_FIELD), Some(&json!("u1")));

        // 같은 값 재설정은 변경 아님
        assert!(!apply_set(&mut user, &doc(json!({"role": "admin"}))));
    }

    #[test]
    fn test_upsert_seed() {
        let seed = upsert_seed(
            &doc(json!({"email": "a@x.com"})),
            &doc(json!({"name": "Ann"})),
        );
        assert_eq!(Value::Object(seed), json!({"email": "a@x.com", "name": "Ann"}));
    }
}
