//! 리뷰 저장소.

use shop_core::{collections::REVIEWS, Document, InsertResult};

use crate::error::Result;
use crate::store::SharedStore;

/// 리뷰 저장소.
#[derive(Clone)]
pub struct ReviewRepository {
    store: SharedStore,
}

impl ReviewRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.find(REVIEWS, &Document::new()).await
    }

    pub async fn create(&self, review: Document) -> Result<InsertResult> {
        self.store.insert_one(REVIEWS, review).await
    }
}
