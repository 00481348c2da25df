//! 리뷰 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use shop_core::{Document, InsertResult};
use tracing::info;

use crate::error::{db_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 리뷰 목록.
///
/// GET /review
#[utoipa::path(
    get,
    path = "/review",
    tag = "reviews",
    responses(
        (status = 200, description = "리뷰 목록", body = Vec<Object>),
        (status = 500, description = "저장소 오류", body = ApiErrorResponse)
    )
)]
pub async fn list_reviews(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Document>>> {
    let reviews = state.reviews.list().await.map_err(db_error)?;
    Ok(Json(reviews))
}

/// 리뷰 등록.
///
/// POST /review
#[utoipa::path(
    post,
    path = "/review",
    tag = "reviews",
    request_body = Object,
    responses(
        (status = 200, description = "등록 결과", body = InsertResult)
    )
)]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(review): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.reviews.create(review).await.map_err(db_error)?;
    info!(id = %result.inserted_id, "Review added");
    Ok(Json(result))
}

/// 리뷰 라우터 생성.
pub fn reviews_router() -> Router<Arc<AppState>> {
    Router::new().route("/review", get(list_reviews).post(create_review))
}
