//! OAuth client repository
//!
//! Registered API consumers. Secrets are stored as argon2id hashes; the
//! plaintext exists only in the caller's hands at registration time.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::OAuthClientRow;

const OAUTH_CLIENT_COLUMNS: &str =
    "id, client_id, client_secret_hash, name, created_at, updated_at";

type OAuthClientTuple = (String, String, String, String, i64, i64);

fn row_from_tuple(t: OAuthClientTuple) -> OAuthClientRow {
    let (id, client_id, client_secret_hash, name, created_at, updated_at) = t;
    OAuthClientRow {
        id,
        client_id,
        client_secret_hash,
        name,
        created_at,
        updated_at,
    }
}

/// Register a new OAuth client
pub async fn create_oauth_client(
    pool: &SqlitePool,
    client_id: &str,
    client_secret_hash: &str,
    name: &str,
) -> Result<OAuthClientRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO oauth_clients (id, client_id, client_secret_hash, name, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(client_id)
    .bind(client_secret_hash)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(OAuthClientRow {
        id,
        client_id: client_id.to_string(),
        client_secret_hash: client_secret_hash.to_string(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Look up an OAuth client by its public client_id
pub async fn get_by_client_id(
    pool: &SqlitePool,
    client_id: &str,
) -> Result<Option<OAuthClientRow>, SqliteError> {
    let row = sqlx::query_as::<_, OAuthClientTuple>(&format!(
        "SELECT {} FROM oauth_clients WHERE client_id = ?",
        OAUTH_CLIENT_COLUMNS
    ))
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_from_tuple))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = setup_test_pool().await;
        create_oauth_client(&pool, "app123", "$argon2id$fake", "Default Client")
            .await
            .unwrap();

        let found = get_by_client_id(&pool, "app123").await.unwrap().unwrap();
        assert_eq!(found.name, "Default Client");
        assert!(get_by_client_id(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_client_id_rejected() {
        let pool = setup_test_pool().await;
        create_oauth_client(&pool, "app123", "h", "One").await.unwrap();
        let err = create_oauth_client(&pool, "app123", "h", "Two")
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }
}
