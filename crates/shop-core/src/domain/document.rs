//! 문서 표현 및 쓰기 결과 타입.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// 저장소에 보관되는 문서 (JSON 객체).
pub type Document = Map<String, Value>;

/// 문서 식별자 필드 이름.
pub const ID_FIELD: &str = "_id";

/// 컬렉션 이름.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const REVIEWS: &str = "reviews";
    pub const USERS: &str = "users";
}

/// 직렬화 가능한 값을 문서로 변환합니다.
pub fn to_document<T: Serialize>(value: &T) -> CoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::NotAnObject),
    }
}

/// 단일 필드 동등 비교 필터를 생성합니다.
pub fn filter_eq(field: &str, value: impl Into<Value>) -> Document {
    let mut filter = Document::new();
    filter.insert(field.to_string(), value.into());
    filter
}

/// 삽입 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// 갱신 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    /// upsert로 새 문서가 생성된 경우 그 ID
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    /// 일치하는 문서가 없고 upsert도 하지 않은 결과.
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
        }
    }
}

/// 삭제 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
