//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppEnv, Config};
use crate::domains::auth::jwt::JwtService;
use crate::domains::auth::models::AuditLogger;
use crate::server::middleware::{capture_client_meta, jwt_auth_middleware};
use crate::server::routes::{
    health_handler, register_handler, send_otp_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub audit: AuditLogger,
    pub jwt_service: Arc<JwtService>,
    pub app_env: AppEnv,
}

/// Build the Axum application router.
///
/// Everything the pipeline needs (signing secret, operating mode) comes in
/// through `config` here; no business code reads the environment.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let app_state = AppState {
        db_pool: pool.clone(),
        audit: AuditLogger::new(pool),
        jwt_service: jwt_service.clone(),
        app_env: config.app_env,
    };

    // CORS configuration - mobile clients and the web frontend
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting: OTP send/verify are the abuse-prone operations.
    // 10/sec with burst of 20 per client IP.
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor) // Extract IP from X-Forwarded-For header
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let jwt_service_for_middleware = jwt_service;

    Router::new()
        // Authentication endpoints, rate limited
        .route("/auth/send-otp", post(send_otp_handler))
        .route("/auth/verify-otp", post(verify_otp_handler))
        .route("/auth/register", post(register_handler))
        .layer(rate_limit_layer)
        // Health check (no rate limit)
        .route("/auth/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(middleware::from_fn(capture_client_meta))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
