//! Client (customer) repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::ClientRow;

const CLIENT_COLUMNS: &str = "id, name, email, phone, created_at, updated_at";

/// Fields applied by a partial client update
#[derive(Debug, Default, Clone)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Create a new client with a generated CUID2 ID
pub async fn create_client(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<ClientRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO clients (id, name, email, phone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ClientRow {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a client by ID
pub async fn get_client(pool: &SqlitePool, id: &str) -> Result<Option<ClientRow>, SqliteError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {} FROM clients WHERE id = ?",
        CLIENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get a client by email (uniqueness pre-check)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<ClientRow>, SqliteError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {} FROM clients WHERE email = ?",
        CLIENT_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List clients, name ascending
pub async fn list_clients(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<ClientRow>, u64), SqliteError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;

    let offset = (page.saturating_sub(1) as i64) * limit as i64;
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {} FROM clients ORDER BY name ASC LIMIT ? OFFSET ?",
        CLIENT_COLUMNS
    ))
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total as u64))
}

/// Apply a partial update, keeping untouched fields
pub async fn update_client(
    pool: &SqlitePool,
    id: &str,
    update: ClientUpdate,
) -> Result<Option<ClientRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {} FROM clients WHERE id = ?",
        CLIENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Ok(None);
    };

    let name = update.name.unwrap_or(current.name);
    let email = update.email.unwrap_or(current.email);
    let phone = update.phone.unwrap_or(current.phone);
    let now = chrono::Utc::now().timestamp();

    sqlx::query("UPDATE clients SET name = ?, email = ?, phone = ?, updated_at = ? WHERE id = ?")
        .bind(&name)
        .bind(&email)
        .bind(&phone)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(ClientRow {
        id: id.to_string(),
        name,
        email,
        phone,
        created_at: current.created_at,
        updated_at: now,
    }))
}

/// Delete a client by ID
pub async fn delete_client(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;

    #[tokio::test]
    async fn test_create_get_list() {
        let pool = setup_test_pool().await;
        let c = create_client(&pool, "Vinoteca Sur", "sur@example.com", "555-0101")
            .await
            .unwrap();

        let fetched = get_client(&pool, &c.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "sur@example.com");

        let (rows, total) = list_clients(&pool, 1, 50).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = setup_test_pool().await;
        create_client(&pool, "One", "dup@example.com", "1").await.unwrap();
        let err = create_client(&pool, "Two", "dup@example.com", "2")
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_client_partial() {
        let pool = setup_test_pool().await;
        let c = create_client(&pool, "Old", "old@example.com", "1").await.unwrap();

        let updated = update_client(
            &pool,
            &c.id,
            ClientUpdate {
                phone: Some("2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "Old");
        assert_eq!(updated.phone, "2");
    }

    #[tokio::test]
    async fn test_delete_client() {
        let pool = setup_test_pool().await;
        let c = create_client(&pool, "Gone", "gone@example.com", "1").await.unwrap();
        assert!(delete_client(&pool, &c.id).await.unwrap());
        assert!(!delete_client(&pool, &c.id).await.unwrap());
    }
}
