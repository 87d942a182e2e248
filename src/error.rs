use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Stored hash could not be parsed. Kept separate from InvalidCredentials
    // so callers can log the difference, but the outward body is identical.
    #[error("Stored credential has an invalid format")]
    CredentialFormat,

    #[error("User is inactive")]
    UserInactive,

    #[error("Client not found")]
    ClientNotFound,

    #[error("Client is inactive")]
    ClientInactive,

    #[error("Refresh token invalid")]
    RefreshTokenInvalid,

    #[error("Refresh token revoked")]
    RefreshTokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Wrong token type")]
    WrongTokenType,

    #[error("Token not issued for this client")]
    ClientMismatch,

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::EmailInUse => {
                (StatusCode::CONFLICT, "Email already registered".to_string())
            }
            // Unknown email, wrong password and an unreadable stored hash all
            // collapse into one body so the endpoint cannot be used as an
            // account oracle.
            AuthError::InvalidCredentials | AuthError::CredentialFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::UserInactive => {
                (StatusCode::UNAUTHORIZED, "User is inactive".to_string())
            }
            AuthError::ClientNotFound => {
                (StatusCode::UNAUTHORIZED, "Client not found".to_string())
            }
            AuthError::ClientInactive => {
                (StatusCode::UNAUTHORIZED, "Client is inactive".to_string())
            }
            AuthError::RefreshTokenInvalid => {
                (StatusCode::UNAUTHORIZED, "Refresh token invalid".to_string())
            }
            AuthError::RefreshTokenRevoked => {
                (StatusCode::UNAUTHORIZED, "Refresh token revoked".to_string())
            }
            AuthError::RefreshTokenExpired => {
                (StatusCode::UNAUTHORIZED, "Refresh token expired".to_string())
            }
            AuthError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
            AuthError::WrongTokenType => {
                (StatusCode::UNAUTHORIZED, "Wrong token type".to_string())
            }
            AuthError::ClientMismatch => (
                StatusCode::UNAUTHORIZED,
                "Token not issued for this client".to_string(),
            ),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            // Storage and crypto detail never crosses the boundary.
            AuthError::Database(detail) | AuthError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    }
}
