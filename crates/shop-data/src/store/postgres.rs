//! PostgreSQL 문서 저장소 구현.
//!
//! 모든 컬렉션을 하나의 `documents` 테이블에 JSONB로 저장합니다.
//! 동등 비교 필터는 JSONB 포함 연산자(`@>`)로 변환됩니다. 스칼라 필드
//! (`_id`, `email` 등)에 대해서는 정확한 동등 비교와 같습니다.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use shop_core::{DatabaseConfig, DeleteResult, Document, InsertResult, UpdateResult, ID_FIELD};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info, instrument};

use super::{ensure_id, upsert_seed, DocumentStore};
use crate::error::{DataError, Result};

/// 데이터베이스 연결 풀 래퍼.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 새로운 데이터베이스 연결 풀을 생성합니다.
    pub async fn connect(url: &SecretString, config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url.expose_secret())
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!("Database connection established");

        Ok(Self { pool })
    }

    /// 기존 연결 풀에서 Database 인스턴스를 생성합니다.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 내부 연결 풀을 반환합니다.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 데이터베이스 마이그레이션을 실행합니다.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");

        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DataError::MigrationError(e.to_string()))?;

        info!("Migrations completed successfully");
        Ok(())
    }

    /// 데이터베이스 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::QueryError(e.to_string()))?;
        Ok(())
    }
}

/// PostgreSQL(JSONB) 기반 문서 저장소.
#[derive(Clone)]
pub struct PgDocumentStore {
    db: Database,
}

impl PgDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 필터와 일치하는 첫 번째 문서의 ID.
    async fn first_matching_id(&self, collection: &str, filter: &Document) -> Result<Option<String>> {
        let id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT id FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_optional(self.db.pool())
        .await?;

        Ok(id)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, filter))]
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>> {
        let rows = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    #[instrument(skip(self, filter))]
    async fn find_one(&self, collection: &str, filter: &Document) -> Result<Option<Document>> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|Json(doc)| doc))
    }

    #[instrument(skip(self, document))]
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertResult> {
        let id = ensure_id(&mut document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&document))
        .execute(self.db.pool())
        .await?;

        debug!(collection, id = %id, "Inserted document");

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self, filter, set))]
    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        mut set: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        set.remove(ID_FIELD);

        if let Some(id) = self.first_matching_id(collection, filter).await? {
            // 이미 같은 값을 가진 문서는 수정으로 세지 않음
            let modified = sqlx::query(
                r#"
                UPDATE documents
                SET body = body || $3
                WHERE collection = $1 AND id = $2 AND NOT (body @> $3)
                "#,
            )
            .bind(collection)
            .bind(&id)
            .bind(Json(&set))
            .execute(self.db.pool())
            .await?
            .rows_affected();

            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: modified,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult::unmatched());
        }

        let mut seed = upsert_seed(filter, &set);
        seed.remove(ID_FIELD);
        let inserted = self.insert_one(collection, seed).await?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(inserted.inserted_id),
        })
    }

    #[instrument(skip(self, filter))]
    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<DeleteResult> {
        let deleted = match self.first_matching_id(collection, filter).await? {
            Some(id) => sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(&id)
                .execute(self.db.pool())
                .await?
                .rows_affected(),
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.db.health_check().await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
