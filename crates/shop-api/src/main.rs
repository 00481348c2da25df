//! 공구 쇼핑몰 API 서버.
//!
//! 설정을 로드하고 문서 저장소와 결제 대행사를 연결한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use shop_api::auth::{TokenKeys, AUTH_HEADER};
use shop_api::metrics::setup_metrics_recorder;
use shop_api::middleware::metrics_layer;
use shop_api::openapi::swagger_ui_router;
use shop_api::routes::create_api_router;
use shop_api::state::AppState;
use shop_core::{init_logging, AppConfig, CorsConfig, DatabaseConfig, LogConfig};
use shop_data::{Database, MemoryDocumentStore, PgDocumentStore, SharedStore};
use shop_payment::{PaymentProcessor, StripeClient, StripeConfig};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 문서 저장소 생성.
///
/// `database.url`이 없으면 인메모리 저장소로 동작합니다.
async fn create_store(config: &DatabaseConfig) -> anyhow::Result<SharedStore> {
    let Some(url) = &config.url else {
        warn!("DATABASE_URL not set, using in-memory document store (data is not persisted)");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    };

    let db = Database::connect(url, config)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        db.migrate().await.context("failed to run migrations")?;
    }

    info!("Using PostgreSQL document store");
    Ok(Arc::new(PgDocumentStore::new(db)))
}

/// AppState 초기화.
async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.uses_dev_token_secret() {
        warn!("ACCESS_TOKEN_SECRET not set, using default (INSECURE for development only)");
    }

    let store = create_store(&config.database).await?;
    let mut state = AppState::new(store, TokenKeys::from_config(&config.auth));

    match StripeConfig::from_config(&config.payment) {
        Some(stripe) => {
            info!(currency = %stripe.currency, "Stripe payment processor configured");
            let processor: Arc<dyn PaymentProcessor> = Arc::new(StripeClient::new(stripe));
            state = state.with_payment(processor);
        }
        None => {
            warn!("STRIPE_SECRET_KEY not set, /payment will be unavailable");
        }
    }

    Ok(state)
}

/// CORS 미들웨어 구성.
///
/// 허용 origin 목록이 비어 있으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        warn!("CORS origins not set, allowing any origin (development mode)");
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(AUTH_HEADER),
        ])
        // 와일드카드 origin과 자격 증명은 함께 쓸 수 없음
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle, cors: &CorsConfig) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(cors))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use shop_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        return Ok(true);
    }

    Ok(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(LogConfig::from(&config.logging)).map_err(|e| anyhow::anyhow!(e))?;

    // 영속 저장소에서 기본 시크릿 사용 시 시작 거부
    config.validate().context("invalid configuration")?;

    info!("Starting Tool Shop API server...");

    let metrics_handle = setup_metrics_recorder().context("failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    let state = Arc::new(create_app_state(&config).await?);

    info!(version = %state.version, "Application state initialized");
    info!(
        store = state.store.backend(),
        has_payment = state.has_payment(),
        token_ttl_hours = state.token_keys.ttl().num_hours(),
        "Service connections status"
    );

    let addr = config.server.bind_address();
    let app = create_router(state, metrics_handle, &config.cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let shutdown_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
