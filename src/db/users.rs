use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::models::User;

/// Create a new user. A duplicate email surfaces as `EmailInUse`.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, name, active, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, true, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::EmailInUse,
        _ => AuthError::Database(e.to_string()),
    })?;

    Ok(user)
}

/// Look up a user by email. Exact, case-sensitive match.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Flip the account's active flag.
pub async fn set_active(pool: &PgPool, user_id: Uuid, active: bool) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users SET active = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2
        "#,
    )
    .bind(active)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
