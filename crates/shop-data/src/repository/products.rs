//! 상품 저장소.

use shop_core::{
    collections::PRODUCTS, filter_eq, DeleteResult, Document, InsertResult, UpdateResult, ID_FIELD,
};

use crate::error::Result;
use crate::store::SharedStore;

/// 상품 저장소.
#[derive(Clone)]
pub struct ProductRepository {
    store: SharedStore,
}

impl ProductRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 전체 상품 목록.
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.find(PRODUCTS, &Document::new()).await
    }

    /// ID로 상품 조회.
    pub async fn get(&self, id: &str) -> Result<Option<Document>> {
        self.store.find_one(PRODUCTS, &filter_eq(ID_FIELD, id)).await
    }

    /// 상품 등록.
    pub async fn create(&self, product: Document) -> Result<InsertResult> {
        self.store.insert_one(PRODUCTS, product).await
    }

    /// 상품 필드 병합 (재고 수량 변경 등).
    pub async fn update(&self, id: &str, set: Document) -> Result<UpdateResult> {
        self.store
            .update_one(PRODUCTS, &filter_eq(ID_FIELD, id), set, false)
            .await
    }

    /// 상품 삭제.
    pub async fn delete(&self, id: &str) -> Result<DeleteResult> {
        self.store.delete_one(PRODUCTS, &filter_eq(ID_FIELD, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDocumentStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_update_delete() {
        let repo = ProductRepository::new(Arc::new(MemoryDocumentStore::new()));
        let Value::Object(product) =
            json!({"name": "Wrench", "price": 9.99, "availableQuantity": 500})
        else {
            unreachable!()
        };

        let inserted = repo.create(product).await.unwrap();
        let id = inserted.inserted_id;

        let mut set = Document::new();
        set.insert("availableQuantity".to_string(), json!(450));
        assert_eq!(repo.update(&id, set).await.unwrap().modified_count, 1);

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored["availableQuantity"], 450);
        assert_eq!(stored["price"], 9.99);

        assert_eq!(repo.delete(&id).await.unwrap().deleted_count, 1);
        assert!(repo.get(&id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
