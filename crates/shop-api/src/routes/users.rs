//! 사용자 프로필 endpoint.
//!
//! 프로필 조회/upsert와 관리자 지정. 관리자 지정은 유효한 세션 토큰만
//! 요구하며 호출자의 역할은 확인하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shop_core::{Document, UpdateResult};
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthErrorBody, JwtAuth};
use crate::error::{db_error, not_found, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 관리자 여부 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub admin: bool,
}

/// 전체 사용자 목록.
///
/// GET /user
#[utoipa::path(
    get,
    path = "/user",
    tag = "users",
    security(("author" = [])),
    responses(
        (status = 200, description = "사용자 목록", body = Vec<Object>),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn list_users(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Document>>> {
    let users = state.users.list().await.map_err(db_error)?;
    Ok(Json(users))
}

/// 프로필 조회.
///
/// GET /user/{email}
#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "사용자 이메일")
    ),
    responses(
        (status = 200, description = "프로필", body = Object),
        (status = 404, description = "프로필 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_user(
    Path(email): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Document>> {
    state
        .users
        .get_by_email(&email)
        .await
        .map_err(db_error)?
        .map(Json)
        .ok_or_else(|| not_found("user", &email))
}

/// 프로필 upsert.
///
/// PUT /user/{email}
#[utoipa::path(
    put,
    path = "/user/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "사용자 이메일")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "upsert 결과", body = UpdateResult)
    )
)]
pub async fn upsert_user(
    Path(email): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(profile): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state.users.upsert(&email, profile).await.map_err(db_error)?;
    info!(
        created = result.upserted_id.is_some(),
        modified = result.modified_count,
        "User profile upserted"
    );
    Ok(Json(result))
}

/// 관리자 지정.
///
/// PUT /userAdmin/{email}
#[utoipa::path(
    put,
    path = "/userAdmin/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "관리자로 지정할 사용자 이메일")
    ),
    security(("author" = [])),
    responses(
        (status = 200, description = "수정 결과", body = UpdateResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn make_admin(
    JwtAuth(_claims): JwtAuth,
    Path(email): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state.users.make_admin(&email).await.map_err(db_error)?;
    info!(matched = result.matched_count, "Admin role granted");
    Ok(Json(result))
}

/// 관리자 여부 확인.
///
/// GET /admin/{email}
#[utoipa::path(
    get,
    path = "/admin/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "사용자 이메일")
    ),
    responses(
        (status = 200, description = "관리자 여부", body = AdminResponse)
    )
)]
pub async fn check_admin(
    Path(email): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AdminResponse>> {
    let admin = state.users.is_admin(&email).await.map_err(db_error)?;
    Ok(Json(AdminResponse { admin }))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(list_users))
        .route("/user/{email}", get(get_user).put(upsert_user))
        .route("/userAdmin/{email}", put(make_admin))
        .route("/admin/{email}", get(check_admin))
}
