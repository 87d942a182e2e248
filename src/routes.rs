/// Route definitions and middleware layering
use std::sync::Arc;

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::error::AuthError;
use crate::handlers;
use crate::middleware::{rate_limit, RateLimiter};
use crate::openapi::ApiDoc;
use crate::AppState;

pub fn build_router(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    // The validation boundary is the one endpoint exposed to other services,
    // so it is the one that gets rate limited.
    let validate = Router::new()
        .route("/api/v1/validate", post(handlers::validate_token))
        .layer(axum_middleware::from_fn_with_state(
            limiter,
            rate_limit::rate_limit,
        ));

    Router::new()
        .route("/api/v1/auth/register", post(handlers::register))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/refresh", post(handlers::refresh_token))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/profile", get(handlers::profile))
        .route("/api/v1/clients", post(handlers::create_client))
        .merge(validate)
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Ready once the database answers.
async fn readiness_check(State(state): State<AppState>) -> Result<&'static str, AuthError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok("READY")
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
