//! 주문 저장소.

use shop_core::{
    collections::ORDERS, filter_eq, DeleteResult, Document, InsertResult, PaymentRecord,
    UpdateResult, EMAIL_FIELD, ID_FIELD,
};

use crate::error::Result;
use crate::store::SharedStore;

/// 주문 저장소.
#[derive(Clone)]
pub struct OrderRepository {
    store: SharedStore,
}

impl OrderRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 새 주문 생성 (본문 그대로 저장).
    pub async fn create(&self, order: Document) -> Result<InsertResult> {
        self.store.insert_one(ORDERS, order).await
    }

    /// 전체 주문 목록.
    pub async fn list_all(&self) -> Result<Vec<Document>> {
        self.store.find(ORDERS, &Document::new()).await
    }

    /// 이메일이 정확히 일치하는 주문 목록.
    ///
    /// 대소문자 정규화 없이 저장된 `email` 값과 그대로 비교합니다.
    /// `email` 필드가 없는 주문은 어떤 값과도 일치하지 않습니다.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Document>> {
        self.store.find(ORDERS, &filter_eq(EMAIL_FIELD, email)).await
    }

    /// ID로 주문 조회.
    pub async fn get(&self, id: &str) -> Result<Option<Document>> {
        self.store.find_one(ORDERS, &filter_eq(ID_FIELD, id)).await
    }

    /// 결제 완료 기록.
    pub async fn mark_paid(&self, id: &str, record: &PaymentRecord) -> Result<UpdateResult> {
        self.store
            .update_one(ORDERS, &filter_eq(ID_FIELD, id), record.to_update()?, false)
            .await
    }

    /// 주문 삭제.
    pub async fn delete(&self, id: &str) -> Result<DeleteResult> {
        self.store.delete_one(ORDERS, &filter_eq(ID_FIELD, id)).await
    }
}
