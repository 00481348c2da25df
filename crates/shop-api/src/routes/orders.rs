//! 주문 endpoint.
//!
//! `/myOrders`만 소유권 확인을 거칩니다. 나머지 보호된 라우트는 유효한
//! 세션 토큰만 요구합니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shop_core::{DeleteResult, Document, InsertResult, PaymentRecord, UpdateResult};
use tracing::{debug, info};
use utoipa::IntoParams;

use crate::auth::{authorize_owner_read, AuthErrorBody, JwtAuth};
use crate::error::{db_error, not_found, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// `/myOrders` 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyOrdersQuery {
    /// 조회할 주문자 이메일 (토큰의 email과 정확히 일치해야 함)
    #[serde(default)]
    pub email: String,
}

/// 주문 생성.
///
/// POST /order
#[utoipa::path(
    post,
    path = "/order",
    tag = "orders",
    request_body = Object,
    responses(
        (status = 200, description = "생성 결과", body = InsertResult),
        (status = 500, description = "저장소 오류", body = ApiErrorResponse)
    )
)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Json(order): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.orders.create(order).await.map_err(db_error)?;
    info!(id = %result.inserted_id, "Order placed");
    Ok(Json(result))
}

/// 전체 주문 목록.
///
/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    security(("author" = [])),
    responses(
        (status = 200, description = "주문 목록", body = Vec<Object>),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn list_orders(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Document>>> {
    let orders = state.orders.list_all().await.map_err(db_error)?;
    Ok(Json(orders))
}

/// 내 주문 목록.
///
/// 토큰의 `email`과 쿼리의 `email`이 정확히 같을 때만 해당 이메일의
/// 주문을 반환합니다. 다르면 잘못된 토큰과 같은 403을 반환합니다.
///
/// GET /myOrders?email=
#[utoipa::path(
    get,
    path = "/myOrders",
    tag = "orders",
    params(MyOrdersQuery),
    security(("author" = [])),
    responses(
        (status = 200, description = "요청한 이메일의 주문 목록", body = Vec<Object>),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰 또는 다른 사용자의 이메일", body = AuthErrorBody)
    )
)]
pub async fn my_orders(
    JwtAuth(claims): JwtAuth,
    Query(query): Query<MyOrdersQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Document>>, Response> {
    authorize_owner_read(&claims, &query.email).map_err(IntoResponse::into_response)?;

    let orders = state
        .orders
        .list_by_email(&query.email)
        .await
        .map_err(|e| db_error(e).into_response())?;

    debug!(count = orders.len(), "Owner order read");
    Ok(Json(orders))
}

/// 주문 조회.
///
/// GET /order/{id}
#[utoipa::path(
    get,
    path = "/order/{id}",
    tag = "orders",
    params(
        ("id" = String, Path, description = "주문 ID")
    ),
    security(("author" = [])),
    responses(
        (status = 200, description = "주문", body = Object),
        (status = 404, description = "주문 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_order(
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Document>> {
    state
        .orders
        .get(&id)
        .await
        .map_err(db_error)?
        .map(Json)
        .ok_or_else(|| not_found("order", &id))
}

/// 결제 완료 기록.
///
/// PATCH /order/{id}
#[utoipa::path(
    patch,
    path = "/order/{id}",
    tag = "orders",
    params(
        ("id" = String, Path, description = "주문 ID")
    ),
    request_body = PaymentRecord,
    security(("author" = [])),
    responses(
        (status = 200, description = "수정 결과", body = UpdateResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn mark_order_paid(
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(record): Json<PaymentRecord>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .orders
        .mark_paid(&id, &record)
        .await
        .map_err(db_error)?;
    info!(%id, matched = result.matched_count, "Order marked as paid");
    Ok(Json(result))
}

/// 주문 삭제.
///
/// DELETE /order/{id}
#[utoipa::path(
    delete,
    path = "/order/{id}",
    tag = "orders",
    params(
        ("id" = String, Path, description = "주문 ID")
    ),
    security(("author" = [])),
    responses(
        (status = 200, description = "삭제 결과", body = DeleteResult),
        (status = 401, description = "토큰 없음", body = AuthErrorBody),
        (status = 403, description = "잘못된 토큰", body = AuthErrorBody)
    )
)]
pub async fn delete_order(
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DeleteResult>> {
    let result = state.orders.delete(&id).await.map_err(db_error)?;
    info!(%id, deleted = result.deleted_count, "Order deleted");
    Ok(Json(result))
}

/// 주문 라우터 생성.
pub fn orders_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/order", post(place_order))
        .route("/orders", get(list_orders))
        .route("/myOrders", get(my_orders))
        .route(
            "/order/{id}",
            get(get_order).patch(mark_order_paid).delete(delete_order),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::{json, Map, Value};
    use tower::ServiceExt;

    fn token_for(state: &AppState, email: &str) -> String {
        let mut identity = Map::new();
        identity.insert("email".to_string(), json!(email));
        format!("Bearer {}", state.token_keys.issue(identity).unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn seed(state: &AppState, email: &str, product: &str) -> String {
        let Value::Object(order) = json!({"email": email, "productName": product, "quantity": 100})
        else {
            unreachable!()
        };
        state.orders.create(order).await.unwrap().inserted_id
    }

    #[tokio::test]
    async fn test_my_orders_returns_only_owner_orders() {
        let state = Arc::new(create_test_state());
        seed(&state, "a@x.com", "Drill").await;
        seed(&state, "b@x.com", "Saw").await;
        seed(&state, "a@x.com", "Hammer").await;

        let app = orders_router().with_state(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/myOrders?email=a@x.com")
                    .header("author", token_for(&state, "a@x.com"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let orders = body_json(response).await;
        let orders = orders.as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o["email"] == "a@x.com"));
    }

    #[tokio::test]
    async fn test_my_orders_rejects_other_email() {
        let state = Arc::new(create_test_state());
        seed(&state, "other@x.com", "Saw").await;

        let app = orders_router().with_state(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/myOrders?email=other@x.com")
                    .header("author", token_for(&state, "a@x.com"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({"name": "WrongToken", "message": "Forbidden Access"})
        );
    }

    #[tokio::test]
    async fn test_my_orders_without_header_is_401() {
        let app = orders_router().with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/myOrders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_mark_paid_and_fetch() {
        let state = Arc::new(create_test_state());
        let id = seed(&state, "a@x.com", "Drill").await;
        let app = orders_router().with_state(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/order/{}", id))
                    .header("author", token_for(&state, "a@x.com"))
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"transactionId":"pi_123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let update = body_json(response).await;
        assert_eq!(update["matchedCount"], 1);
        assert_eq!(update["modifiedCount"], 1);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/order/{}", id))
                    .header("author", token_for(&state, "someone@else.com"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let order = body_json(response).await;
        assert_eq!(order["paid"], true);
        assert_eq!(order["transactionId"], "pi_123");
    }

    #[tokio::test]
    async fn test_place_order_is_public() {
        let state = Arc::new(create_test_state());
        let app = orders_router().with_state(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/order")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"a@x.com","productName":"Drill","quantity":150,"address":"Dhaka"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = state.orders.list_by_email("a@x.com").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].contains_key("paid"));
        assert_eq!(stored[0]["address"], "Dhaka");
    }

    #[tokio::test]
    async fn test_place_order_keeps_untyped_fields() {
        let state = Arc::new(create_test_state());
        let app = orders_router().with_state(state.clone());

        for body in [
            r#"{"email":"a@x.com","quantity":"3"}"#,
            r#"{"email":"a@x.com","quantity":1.5}"#,
            r#"{"email":["a@x.com"],"quantity":2}"#,
            r#"{"productName":"Drill"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/order")
                        .header(CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", body);
        }

        let all = state.orders.list_all().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0]["quantity"], "3");
        assert_eq!(all[1]["quantity"], 1.5);
        assert_eq!(all[2]["email"], json!(["a@x.com"]));
        assert!(!all[3].contains_key("email"));
        assert!(!all[3].contains_key("paid"));
    }

    #[tokio::test]
    async fn test_empty_email_token_sees_no_emailless_orders() {
        let state = Arc::new(create_test_state());
        let Value::Object(order) = json!({"productName": "Drill"}) else {
            unreachable!()
        };
        state.orders.create(order).await.unwrap();

        let app = orders_router().with_state(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/myOrders?email=")
                    .header("author", token_for(&state, ""))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}
