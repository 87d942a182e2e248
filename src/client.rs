/// Client side of the cross-service validation contract.
///
/// A consuming service forwards the caller's bearer token together with its
/// own registered client id, and treats any non-2xx answer as
/// "unauthenticated". Identity is never inferred from an error body.
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::models::{UserResponse, ValidateTokenRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    client_id: Uuid,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, client_id: Uuid) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build http client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id,
            http,
        })
    }

    /// Ask the issuer whether `token` is valid for this client.
    /// Transient transport faults surface as `Internal`; the caller decides
    /// whether to retry, this client never does.
    pub async fn validate_token(&self, token: &str) -> Result<UserResponse> {
        let request = ValidateTokenRequest {
            token: token.to_string(),
            client_id: self.client_id,
        };

        let response = self
            .http
            .post(format!("{}/api/v1/validate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("validate request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::TokenInvalid);
        }

        response
            .json::<UserResponse>()
            .await
            .map_err(|e| AuthError::Internal(format!("invalid validate response: {e}")))
    }
}
