//! 인메모리 문서 저장소.
//!
//! `DATABASE_URL` 없이 서버를 띄우거나 테스트할 때 사용합니다.
//! 프로세스 종료 시 데이터는 사라집니다.

use std::collections::HashMap;

use async_trait::async_trait;
use shop_core::{DeleteResult, Document, InsertResult, UpdateResult, ID_FIELD};
use tokio::sync::RwLock;

use super::{apply_set, ensure_id, matches, upsert_seed, DocumentStore};
use crate::error::{DataError, Result};

/// 인메모리 문서 저장소.
///
/// 컬렉션별로 삽입 순서를 유지합니다.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: &Document) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, filter)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertResult> {
        let id = ensure_id(&mut document)?;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs
            .iter()
            .any(|doc| doc.get(ID_FIELD).and_then(|v| v.as_str()) == Some(id.as_str()))
        {
            return Err(DataError::DuplicateError(format!(
                "{}: duplicate _id {}",
                collection, id
            )));
        }

        docs.push(document);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, filter)) {
            let modified = apply_set(doc, &set);
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult::unmatched());
        }

        let mut seed = upsert_seed(filter, &set);
        seed.remove(ID_FIELD);
        let id = ensure_id(&mut seed)?;
        docs.push(seed);

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<DeleteResult> {
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(collection) {
            Some(docs) => match docs.iter().position(|doc| matches(doc, filter)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
