//! 사용자 프로필 저장소.

use serde_json::Value;
use shop_core::{
    collections::USERS, filter_eq, is_admin, Document, UpdateResult, ADMIN_ROLE, ROLE_FIELD,
};

use crate::error::Result;
use crate::store::SharedStore;

/// 사용자 프로필 저장소.
///
/// 프로필은 `email`로 식별됩니다.
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 전체 사용자 목록.
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.find(USERS, &Document::new()).await
    }

    /// 이메일로 사용자 조회.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Document>> {
        self.store.find_one(USERS, &filter_eq("email", email)).await
    }

    /// 프로필 upsert.
    ///
    /// 기존 프로필에 `profile` 필드를 병합하고, 없으면 새로 생성합니다.
    pub async fn upsert(&self, email: &str, mut profile: Document) -> Result<UpdateResult> {
        profile.insert("email".to_string(), Value::String(email.to_string()));
        self.store
            .update_one(USERS, &filter_eq("email", email), profile, true)
            .await
    }

    /// 관리자 지정.
    ///
    /// 존재하지 않는 사용자는 생성하지 않습니다.
    pub async fn make_admin(&self, email: &str) -> Result<UpdateResult> {
        let mut set = Document::new();
        set.insert(ROLE_FIELD.to_string(), Value::String(ADMIN_ROLE.to_string()));
        self.store
            .update_one(USERS, &filter_eq("email", email), set, false)
            .await
    }

    /// 관리자 여부.
    pub async fn is_admin(&self, email: &str) -> Result<bool> {
        Ok(self
            .get_by_email(email)
            .await?
            .is_some_and(|user| is_admin(&user)))
    }
}
