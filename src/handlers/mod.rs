pub mod auth;
pub mod clients;

pub use auth::{login, logout, profile, refresh_token, register, validate_token};
pub use clients::create_client;
