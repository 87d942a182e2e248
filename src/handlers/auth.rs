/// Authentication handlers
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AuthError;
use crate::models::{
    ErrorResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse,
    UserResponse, ValidateTokenRequest,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub token: String,
    pub client_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub revoked: u64,
}

/// Register endpoint handler. No token is issued here; the new account logs
/// in like any other.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .auth
        .register(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive user/client", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let tokens = state
        .auth
        .login(&payload.email, &payload.password, payload.client_id)
        .await?;

    Ok(Json(tokens))
}

/// Refresh token endpoint handler. Rotation is single-use: the presented
/// token is revoked as part of issuing its successor.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token pair rotated", body = TokenResponse),
        (status = 401, description = "Invalid, revoked or expired refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let tokens = state
        .auth
        .refresh(&payload.refresh_token, payload.client_id)
        .await?;

    Ok(Json(tokens))
}

/// Validation endpoint handler: the trust boundary for consuming services.
#[utoipa::path(
    post,
    path = "/api/v1/validate",
    tag = "Auth",
    request_body = ValidateTokenRequest,
    responses(
        (status = 200, description = "Token is valid; owning identity returned", body = UserResponse),
        (status = 401, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn validate_token(
    State(state): State<AppState>,
    Json(payload): Json<ValidateTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .auth
        .validate(&payload.token, payload.client_id)
        .await?;

    Ok(Json(user))
}

/// Profile endpoint handler. Resolves the bearer token from the
/// Authorization header to the owning account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile of the token's owner", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let token = bearer_token(&headers)?;
    let user = state.auth.profile(token).await?;

    Ok(Json(user))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::TokenInvalid)
}

/// Logout endpoint handler. Validates the access token, then revokes every
/// live refresh token the user holds.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Refresh tokens revoked", body = LogoutResponse),
        (status = 401, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .auth
        .validate(&payload.token, payload.client_id)
        .await?;
    let revoked = state.auth.logout(user.id).await?;

    Ok(Json(LogoutResponse { revoked }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_strips_the_scheme() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_an_invalid_token() {
        let headers = HeaderMap::new();
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn non_bearer_schemes_are_refused() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearer ", "abc"] {
            let headers = headers_with_authorization(value);
            assert!(
                matches!(bearer_token(&headers), Err(AuthError::TokenInvalid)),
                "'{value}' should not yield a token"
            );
        }
    }
}
