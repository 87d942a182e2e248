use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::RefreshToken;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    client_id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<RefreshToken> {
    let refresh_token = sqlx::query_as::<_, RefreshToken>(
        r#"
        INSERT INTO refresh_tokens (id, user_id, client_id, token, expires_at, revoked, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, false, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(client_id)
    .bind(token)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(refresh_token)
}

/// Lookup scoped by client id, so a token issued for one client can never be
/// redeemed under another.
pub async fn find_by_token(
    pool: &PgPool,
    token: &str,
    client_id: Uuid,
) -> Result<Option<RefreshToken>> {
    let refresh_token = sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT * FROM refresh_tokens WHERE token = $1 AND client_id = $2
        "#,
    )
    .bind(token)
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(refresh_token)
}

/// Conditional revocation. Returns whether this call flipped the flag: of two
/// concurrent redemptions of the same token, exactly one sees `true`.
pub async fn revoke(pool: &PgPool, token_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = true, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1 AND revoked = false
        "#,
    )
    .bind(token_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Revoke every live refresh token a user holds, across all clients.
pub async fn revoke_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = true, updated_at = CURRENT_TIMESTAMP
        WHERE user_id = $1 AND revoked = false
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
