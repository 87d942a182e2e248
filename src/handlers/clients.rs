/// Administrative client registration
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::error::AuthError;
use crate::models::{ClientResponse, CreateClientRequest, ErrorResponse};
use crate::AppState;

/// Create a trusted calling application. The response carries the plaintext
/// secret exactly once; only its digest is stored.
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "Clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let client = state
        .auth
        .create_client(&payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}
