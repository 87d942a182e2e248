// Auth Service Library

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;

pub use error::{AuthError, Result};
pub use models::{Claims, Client, RefreshToken, User};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: services::AuthService,
}

#[cfg(test)]
pub(crate) mod tests;
