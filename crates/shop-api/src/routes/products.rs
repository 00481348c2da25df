//! 상품 endpoint.
//!
//! 조회는 공개, 생성/수정/삭제는 세션 토큰이 필요합니다.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shop_core::{DeleteResult, Document, InsertResult, UpdateResult};
use tracing::info;

use crate::auth::{AuthErrorBody, JwtAuth};
use crate::error::{db_error, not_found, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 상품 목록.
///
/// GET /tools
#[utoipa::path(
    get,
    path = "/tools",
    tag = "products",
    responses(
        (status = 200, description = "상품 목록", body = Vec<Object>),
        (status = 500, description = "저장소 오류", body = ApiErrorResponse)
    )
)]
pub async fn list_tools(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Document>>> {
    let products = state.products.list().await.map_err(db_error)?;
    Ok(Json(products))
}

/// 상품 목록 (`/tools`와 동일, 구버전 클라이언트용).
///
/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "상품 목록", body = Vec<Object>)
    )
)]
pub async fn list_products(state: State<Arc<AppState>>) -> ApiResult<Json<Vec<Document>>> {
    list_tools(state).await
}

/// 상품 등록.
///
/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = Object,
    security(("author" = [])),
    responses(
        (status = 200, description = "등록 결과", body = InsertResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn create_product(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(product): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.products.create(product).await.map_err(db_error)?;
    info!(id = %result.inserted_id, "Product created");
    Ok(Json(result))
}

/// 상품 조회.
///
/// GET /product/{id}
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "products",
    params(
        ("id" = String, Path, description = "상품 ID")
    ),
    responses(
        (status = 200, description = "상품", body = Object),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Document>> {
    state
        .products
        .get(&id)
        .await
        .map_err(db_error)?
        .map(Json)
        .ok_or_else(|| not_found("product", &id))
}

/// 상품 수정 (본문 필드 병합).
///
/// PUT /product/{id}
#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "products",
    params(
        ("id" = String, Path, description = "상품 ID")
    ),
    request_body = Object,
    security(("author" = [])),
    responses(
        (status = 200, description = "수정 결과", body = UpdateResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn update_product(
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(set): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state.products.update(&id, set).await.map_err(db_error)?;
    info!(%id, modified = result.modified_count, "Product updated");
    Ok(Json(result))
}

/// 상품 삭제.
///
/// DELETE /product/{id}
#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "products",
    params(
        ("id" = String, Path, description = "상품 ID")
    ),
    security(("author" = [])),
    responses(
        (status = 200, description = "삭제 결과", body = DeleteResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn delete_product(
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DeleteResult>> {
    let result = state.products.delete(&id).await.map_err(db_error)?;
    info!(%id, deleted = result.deleted_count, "Product deleted");
    Ok(Json(result))
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/product/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
