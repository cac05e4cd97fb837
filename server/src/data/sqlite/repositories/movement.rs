//! Movement repository
//!
//! Movements are append-only audit records: insert and read, never update
//! or delete. The transfer protocol around the insert lives in
//! `domain::movements`.

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::MovementRow;

const MOVEMENT_COLUMNS: &str =
    "id, product_id, quantity, origin_branch_id, destination_branch_id, user_id, notes, created_at";

/// Append a movement record (transaction-scoped)
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
    origin_branch_id: &str,
    destination_branch_id: &str,
    user_id: &str,
    notes: Option<&str>,
) -> Result<MovementRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO movements (id, product_id, quantity, origin_branch_id, destination_branch_id, user_id, notes, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(product_id)
    .bind(quantity)
    .bind(origin_branch_id)
    .bind(destination_branch_id)
    .bind(user_id)
    .bind(notes)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(MovementRow {
        id,
        product_id: product_id.to_string(),
        quantity,
        origin_branch_id: origin_branch_id.to_string(),
        destination_branch_id: destination_branch_id.to_string(),
        user_id: user_id.to_string(),
        notes: notes.map(String::from),
        created_at: now,
    })
}

/// List movements, newest first (the canonical audit order)
pub async fn list_movements(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<MovementRow>, u64), SqliteError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements")
        .fetch_one(pool)
        .await?;

    let offset = (page.saturating_sub(1) as i64) * limit as i64;
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        "SELECT {} FROM movements ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
        MOVEMENT_COLUMNS
    ))
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total as u64))
}

/// Get a movement by ID
pub async fn get_movement(pool: &SqlitePool, id: &str) -> Result<Option<MovementRow>, SqliteError> {
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        "SELECT {} FROM movements WHERE id = ?",
        MOVEMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;
    use crate::data::sqlite::repositories::{branch, product, user};
    use crate::data::types::Role;

    async fn seed(pool: &SqlitePool) -> (String, String, String, String) {
        let wine = product::create_product(pool, "Audit Wine", None, None, None)
            .await
            .unwrap();
        let a = branch::create_branch(pool, "A").await.unwrap();
        let b = branch::create_branch(pool, "B").await.unwrap();
        let u = user::create_user(pool, "mover", "Mover", None, "h", Role::User)
            .await
            .unwrap();
        (wine.id, a.id, b.id, u.id)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = setup_test_pool().await;
        let (wine, a, b, u) = seed(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let row = insert(&mut conn, &wine, 3, &a, &b, &u, Some("restock"))
            .await
            .unwrap();
        drop(conn);

        let fetched = get_movement(&pool, &row.id).await.unwrap().unwrap();
        assert_eq!(fetched, row);
        assert_eq!(fetched.notes, Some("restock".to_string()));
    }

    #[tokio::test]
    async fn test_same_branch_rejected_by_schema() {
        let pool = setup_test_pool().await;
        let (wine, a, _, u) = seed(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let err = insert(&mut conn, &wine, 3, &a, &a, &u, None).await.unwrap_err();
        assert!(err.is_check_violation());
    }

    #[tokio::test]
    async fn test_unknown_user_rejected_by_schema() {
        let pool = setup_test_pool().await;
        let (wine, a, b, _) = seed(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let err = insert(&mut conn, &wine, 3, &a, &b, "ghost", None)
            .await
            .unwrap_err();
        assert!(err.is_fk_violation());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = setup_test_pool().await;
        let (wine, a, b, u) = seed(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let first = insert(&mut conn, &wine, 1, &a, &b, &u, None).await.unwrap();
        let second = insert(&mut conn, &wine, 2, &b, &a, &u, None).await.unwrap();
        drop(conn);

        let (rows, total) = list_movements(&pool, 1, 50).await.unwrap();
        assert_eq!(total, 2);
        // Same-second inserts fall back to rowid DESC; the later insert leads
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
    }
}
