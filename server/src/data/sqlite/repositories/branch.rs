//! Branch repository for SQLite operations

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::BranchRow;

const BRANCH_COLUMNS: &str = "id, name, created_at, updated_at";

/// Create a new branch with a generated CUID2 ID
pub async fn create_branch(pool: &SqlitePool, name: &str) -> Result<BranchRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query("INSERT INTO branches (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(BranchRow {
        id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a branch by ID
pub async fn get_branch(pool: &SqlitePool, id: &str) -> Result<Option<BranchRow>, SqliteError> {
    let row = sqlx::query_as::<_, BranchRow>(&format!(
        "SELECT {} FROM branches WHERE id = ?",
        BRANCH_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get a branch by its unique name (uniqueness pre-check)
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<BranchRow>, SqliteError> {
    let row = sqlx::query_as::<_, BranchRow>(&format!(
        "SELECT {} FROM branches WHERE name = ?",
        BRANCH_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Check that a branch id exists (transaction-scoped, used by the movement engine)
pub async fn exists(conn: &mut SqliteConnection, id: &str) -> Result<bool, SqliteError> {
    let found: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM branches WHERE id = ?")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

/// List all branches, name ascending
pub async fn list_branches(pool: &SqlitePool) -> Result<Vec<BranchRow>, SqliteError> {
    let rows = sqlx::query_as::<_, BranchRow>(&format!(
        "SELECT {} FROM branches ORDER BY name ASC",
        BRANCH_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Rename a branch
pub async fn update_branch(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<BranchRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query("UPDATE branches SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_branch(pool, id).await
}

/// Delete a branch by ID
pub async fn delete_branch(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM branches WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Check whether any stock row or movement references this branch (delete guard)
pub async fn is_referenced(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM stock WHERE branch_id = ?1) \
         OR EXISTS(SELECT 1 FROM movements WHERE origin_branch_id = ?1 OR destination_branch_id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(referenced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;

    #[tokio::test]
    async fn test_create_get_list() {
        let pool = setup_test_pool().await;
        let b = create_branch(&pool, "Downtown").await.unwrap();
        create_branch(&pool, "Airport").await.unwrap();

        let fetched = get_branch(&pool, &b.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Downtown");

        let all = list_branches(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Airport");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = setup_test_pool().await;
        create_branch(&pool, "Downtown").await.unwrap();
        let err = create_branch(&pool, "Downtown").await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_branch() {
        let pool = setup_test_pool().await;
        let b = create_branch(&pool, "Old").await.unwrap();

        let updated = update_branch(&pool, &b.id, "New").await.unwrap().unwrap();
        assert_eq!(updated.name, "New");

        assert!(update_branch(&pool, "missing", "X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_branch() {
        let pool = setup_test_pool().await;
        let b = create_branch(&pool, "Temp").await.unwrap();
        assert!(delete_branch(&pool, &b.id).await.unwrap());
        assert!(!delete_branch(&pool, &b.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_referenced_by_stock() {
        let pool = setup_test_pool().await;
        let b = create_branch(&pool, "Warehouse").await.unwrap();
        assert!(!is_referenced(&pool, &b.id).await.unwrap());

        let wine = crate::data::sqlite::repositories::product::create_product(
            &pool, "Verdejo", None, None, None,
        )
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO stock (id, product_id, branch_id, quantity, created_at, updated_at) \
             VALUES (?, ?, ?, 5, 0, 0)",
        )
        .bind(cuid2::create_id())
        .bind(&wine.id)
        .bind(&b.id)
        .execute(&pool)
        .await
        .unwrap();

        assert!(is_referenced(&pool, &b.id).await.unwrap());
    }
}
