//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use shop_core::{DeleteResult, InsertResult, PaymentRecord, UpdateResult};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthErrorBody, AUTH_HEADER};
use crate::error::ApiErrorResponse;
use crate::routes::{
    AdminResponse, ComponentHealth, ComponentStatus, HealthResponse, PaymentRequest,
    PaymentResponse, TokenResponse,
};

/// `author` 헤더 보안 스킴 등록.
struct SessionTokenAddon;

impl Modify for SessionTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                AUTH_HEADER,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    AUTH_HEADER,
                    "`<scheme> <token>` 형식. scheme 단어는 검사하지 않습니다.",
                ))),
            );
        }
    }
}

/// Tool Shop API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tool Shop API",
        version = "0.1.0",
        description = r#"
# Tool Shop REST API

공구 제조사 쇼핑몰 백엔드 API입니다.

## 인증

보호된 엔드포인트는 `author: Bearer <token>` 헤더가 필요합니다.
토큰은 `POST /login`으로 발급받으며 10시간 동안 유효합니다.

- 헤더 없음: `401 {"name":"NoToken","message":"Unauthorized Access"}`
- 잘못된/만료된 토큰: `403 {"name":"WrongToken","message":"Forbidden Access"}`
- `/myOrders`는 토큰의 email과 쿼리의 email이 정확히 같아야 합니다.

## 문서

상품, 주문, 리뷰, 프로필 본문은 임의의 JSON 객체로 받아 그대로 저장합니다.
서버가 직접 쓰는 필드는 `_id`, 결제 기록의 `paid`/`transactionId`, 관리자 지정의 `role`뿐입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 세션 토큰 발급"),
        (name = "products", description = "상품 - 공구 목록 및 관리"),
        (name = "orders", description = "주문 - 주문 생성/조회/결제 기록"),
        (name = "reviews", description = "리뷰"),
        (name = "users", description = "사용자 - 프로필 및 관리자 지정"),
        (name = "payment", description = "결제 - payment intent 생성")
    ),
    modifiers(&SessionTokenAddon),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            AuthErrorBody,
            InsertResult,
            UpdateResult,
            DeleteResult,

            // ===== Orders =====
            PaymentRecord,

            // ===== Auth / Payment =====
            TokenResponse,
            AdminResponse,
            PaymentRequest,
            PaymentResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::root,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,

        // ===== Products =====
        crate::routes::products::list_tools,
        crate::routes::products::list_products,
        crate::routes::products::create_product,
        crate::routes::products::get_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,

        // ===== Orders =====
        crate::routes::orders::place_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::my_orders,
        crate::routes::orders::get_order,
        crate::routes::orders::mark_order_paid,
        crate::routes::orders::delete_order,

        // ===== Reviews =====
        crate::routes::reviews::list_reviews,
        crate::routes::reviews::create_review,

        // ===== Users =====
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::upsert_user,
        crate::routes::users::make_admin,
        crate::routes::users::check_admin,

        // ===== Payment =====
        crate::routes::payment::create_payment_intent,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
