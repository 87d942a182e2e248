/// Auth service entry point
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use auth_service::{
    config::Config, db, middleware::RateLimiter, routes, security::jwt::TokenSigner,
    services::AuthService, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration from environment")?;

    tracing::info!(
        "starting auth service on {}:{}",
        config.server_host,
        config.server_port
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    db::init_schema(&db_pool).await?;
    tracing::info!("database connection pool initialized");

    let signer = TokenSigner::new(&config.jwt_secret, config.jwt_expiration_hours);
    let auth = AuthService::new(
        db_pool.clone(),
        signer,
        config.jwt_refresh_expiration_hours,
    );

    let state = AppState { db: db_pool, auth };
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    ));

    let router = routes::build_router(state, limiter);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
