use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Client;

pub async fn find_by_id(pool: &PgPool, client_id: Uuid) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        SELECT * FROM clients WHERE id = $1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Persist a new active client. Only the secret's digest is stored; the
/// plaintext is returned to the caller exactly once at creation time.
pub async fn create_client(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    secret_hash: &str,
) -> Result<Client> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, name, description, secret_hash, active, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, true, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(secret_hash)
    .fetch_one(pool)
    .await?;

    Ok(client)
}
