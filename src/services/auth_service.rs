use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AuthError, Result};
use crate::models::{Client, ClientResponse, TokenResponse, User, UserResponse};
use crate::security::jwt::TokenSigner;
use crate::security::{generate_opaque_token, sha256_hex};

/// Orchestrates registration, login, refresh-token rotation and access token
/// validation. Stateless between requests; all durable state lives in
/// Postgres.
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    signer: TokenSigner,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(db: PgPool, signer: TokenSigner, refresh_expiration_hours: i64) -> Self {
        Self {
            db,
            signer,
            refresh_ttl: Duration::hours(refresh_expiration_hours),
        }
    }

    /// Create an account. No token is issued on registration.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<UserResponse> {
        let password_hash = crate::security::password::hash_password(password)?;
        let user = db::users::create_user(&self.db, email, name, &password_hash).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }

    /// Password login. Checks run in order and stop at the first failure:
    /// client exists/active, user exists, user active, password matches.
    /// The client check comes first so a disabled integration fails before
    /// anything about the user can be observed.
    pub async fn login(&self, email: &str, password: &str, client_id: Uuid) -> Result<TokenResponse> {
        let client = self.require_active_client(client_id).await?;

        let user = db::users::find_by_email(&self.db, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.active {
            return Err(AuthError::UserInactive);
        }

        crate::security::password::verify_password(password, &user.password_hash)?;

        let response = self.issue_token_pair(&user, client.id).await?;
        tracing::info!(user_id = %user.id, client_id = %client.id, "user logged in");
        Ok(response)
    }

    /// Redeem a refresh token for a new token pair. Single-use: the redeemed
    /// token is revoked by a conditional update before its successor becomes
    /// usable, so of two racing redemptions at most one succeeds.
    pub async fn refresh(&self, refresh_token: &str, client_id: Uuid) -> Result<TokenResponse> {
        let client = self.require_active_client(client_id).await?;

        let stored = db::refresh_tokens::find_by_token(&self.db, refresh_token, client.id)
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        if stored.revoked {
            return Err(AuthError::RefreshTokenRevoked);
        }

        if Utc::now() > stored.expires_at {
            return Err(AuthError::RefreshTokenExpired);
        }

        let user = db::users::find_by_id(&self.db, stored.user_id)
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        if !user.active {
            return Err(AuthError::UserInactive);
        }

        // Losing racer of the conditional update is told the token is gone.
        if !db::refresh_tokens::revoke(&self.db, stored.id).await? {
            return Err(AuthError::RefreshTokenRevoked);
        }

        let response = self.issue_token_pair(&user, client.id).await?;
        tracing::info!(user_id = %user.id, client_id = %client.id, "refresh token rotated");
        Ok(response)
    }

    /// Validate an access token presented by a consuming service and return
    /// the owning identity. Purely cryptographic checks come from the signer;
    /// binding and liveness are enforced here.
    pub async fn validate(&self, token: &str, client_id: Uuid) -> Result<UserResponse> {
        let client = self.require_active_client(client_id).await?;

        let claims = self.signer.verify(token)?;
        claims.require_access()?;
        claims.require_client(client.id)?;

        let user = db::users::find_by_id(&self.db, claims.sub)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if !user.active {
            return Err(AuthError::UserInactive);
        }

        Ok(user.into())
    }

    /// Resolve a bearer token to the profile of the account that owns it.
    /// Unlike `validate`, the caller names no client: the binding baked into
    /// the token's own claims is the one that is checked for liveness.
    pub async fn profile(&self, token: &str) -> Result<UserResponse> {
        let claims = self.signer.verify(token)?;
        claims.require_access()?;
        self.require_active_client(claims.client_id).await?;

        let user = db::users::find_by_id(&self.db, claims.sub)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if !user.active {
            return Err(AuthError::UserInactive);
        }

        Ok(user.into())
    }

    /// Administrative: register a trusted calling application. The plaintext
    /// secret is part of the response and is not retrievable afterwards.
    pub async fn create_client(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ClientResponse> {
        let secret = generate_opaque_token();
        let client =
            db::clients::create_client(&self.db, name, description, &sha256_hex(&secret)).await?;

        tracing::info!(client_id = %client.id, "client created");
        Ok(ClientResponse {
            id: client.id,
            name: client.name,
            description: client.description,
            secret,
            active: client.active,
            created_at: client.created_at,
        })
    }

    /// Revoke every live refresh token the user holds.
    pub async fn logout(&self, user_id: Uuid) -> Result<u64> {
        let revoked = db::refresh_tokens::revoke_all_for_user(&self.db, user_id).await?;
        tracing::info!(%user_id, revoked, "user logged out");
        Ok(revoked)
    }

    async fn require_active_client(&self, client_id: Uuid) -> Result<Client> {
        let client = db::clients::find_by_id(&self.db, client_id)
            .await?
            .ok_or(AuthError::ClientNotFound)?;

        if !client.active {
            return Err(AuthError::ClientInactive);
        }

        Ok(client)
    }

    async fn issue_token_pair(&self, user: &User, client_id: Uuid) -> Result<TokenResponse> {
        let access_token = self.signer.mint(user, client_id)?;

        let refresh_token = generate_opaque_token();
        db::refresh_tokens::create(
            &self.db,
            user.id,
            client_id,
            &refresh_token,
            Utc::now() + self.refresh_ttl,
        )
        .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.signer.access_ttl_seconds(),
        })
    }
}
