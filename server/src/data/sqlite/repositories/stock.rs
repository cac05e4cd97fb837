//! Stock ledger repository
//!
//! The authoritative per-(product, branch) quantity table. Quantities never
//! go negative: decrements are conditional updates checked by affected-row
//! count, and the schema CHECK constraint is the last line of defense.
//!
//! Mutations used by the movement engine take `&mut SqliteConnection` so
//! they can run inside the engine's transaction.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::StockRow;

const STOCK_COLUMNS: &str = "id, product_id, branch_id, quantity, created_at, updated_at";

/// Filters for the stock listing
#[derive(Debug, Default, Clone)]
pub struct StockFilter {
    pub branch_id: Option<String>,
    pub product_id: Option<String>,
}

/// Create an explicit stock entry (admin CRUD path)
pub async fn create_stock(
    pool: &SqlitePool,
    product_id: &str,
    branch_id: &str,
    quantity: i64,
) -> Result<StockRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO stock (id, product_id, branch_id, quantity, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(product_id)
    .bind(branch_id)
    .bind(quantity)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(StockRow {
        id,
        product_id: product_id.to_string(),
        branch_id: branch_id.to_string(),
        quantity,
        created_at: now,
        updated_at: now,
    })
}

/// Get a stock entry by ID
pub async fn get_stock(pool: &SqlitePool, id: &str) -> Result<Option<StockRow>, SqliteError> {
    let row = sqlx::query_as::<_, StockRow>(&format!(
        "SELECT {} FROM stock WHERE id = ?",
        STOCK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get the ledger row for a (product, branch) pair
pub async fn get_for_pair(
    conn: &mut SqliteConnection,
    product_id: &str,
    branch_id: &str,
) -> Result<Option<StockRow>, SqliteError> {
    let row = sqlx::query_as::<_, StockRow>(&format!(
        "SELECT {} FROM stock WHERE product_id = ? AND branch_id = ?",
        STOCK_COLUMNS
    ))
    .bind(product_id)
    .bind(branch_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Fetch the ledger row for a pair, creating it with quantity 0 if absent.
///
/// The insert is an idempotent upsert: a concurrent creator wins the unique
/// index race and this call re-fetches the surviving row instead of
/// propagating the constraint violation.
pub async fn ensure_row(
    conn: &mut SqliteConnection,
    product_id: &str,
    branch_id: &str,
) -> Result<StockRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO stock (id, product_id, branch_id, quantity, created_at, updated_at) \
         VALUES (?, ?, ?, 0, ?, ?) \
         ON CONFLICT(product_id, branch_id) DO NOTHING",
    )
    .bind(cuid2::create_id())
    .bind(product_id)
    .bind(branch_id)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    get_for_pair(conn, product_id, branch_id)
        .await?
        .ok_or(SqliteError::Database(sqlx::Error::RowNotFound))
}

/// Conditionally debit a ledger row.
///
/// The WHERE clause re-checks sufficiency atomically at the storage layer;
/// returns false (no rows affected) when the row is missing or the balance
/// is too low.
pub async fn try_decrement(
    conn: &mut SqliteConnection,
    product_id: &str,
    branch_id: &str,
    quantity: i64,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE stock SET quantity = quantity - ?1, updated_at = ?2 \
         WHERE product_id = ?3 AND branch_id = ?4 AND quantity >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .bind(branch_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Credit a ledger row. The row must exist (see `ensure_row`).
pub async fn increment(
    conn: &mut SqliteConnection,
    product_id: &str,
    branch_id: &str,
    quantity: i64,
) -> Result<(), SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE stock SET quantity = quantity + ?1, updated_at = ?2 \
         WHERE product_id = ?3 AND branch_id = ?4",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .bind(branch_id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(SqliteError::Database(sqlx::Error::RowNotFound));
    }
    Ok(())
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a StockFilter) {
    if let Some(branch_id) = &filter.branch_id {
        qb.push(" AND branch_id = ");
        qb.push_bind(branch_id);
    }
    if let Some(product_id) = &filter.product_id {
        qb.push(" AND product_id = ");
        qb.push_bind(product_id);
    }
}

/// List stock entries with optional filters, stable id ordering
pub async fn list_stock(
    pool: &SqlitePool,
    filter: &StockFilter,
    page: u32,
    limit: u32,
) -> Result<(Vec<StockRow>, u64), SqliteError> {
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM stock WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!("SELECT {} FROM stock WHERE 1=1", STOCK_COLUMNS));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY id ASC LIMIT ");
    qb.push_bind(limit as i64);
    qb.push(" OFFSET ");
    qb.push_bind((page.saturating_sub(1) as i64) * limit as i64);

    let rows: Vec<StockRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok((rows, total as u64))
}

/// Set the absolute quantity of a stock entry (admin CRUD path).
/// The caller validates `quantity >= 0`; the CHECK constraint backstops.
pub async fn update_quantity(
    pool: &SqlitePool,
    id: &str,
    quantity: i64,
) -> Result<Option<StockRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query("UPDATE stock SET quantity = ?, updated_at = ? WHERE id = ?")
        .bind(quantity)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_stock(pool, id).await
}

/// Delete a stock entry by ID
pub async fn delete_stock(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM stock WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Check whether any stock row references this product (delete guard)
pub async fn any_for_product(pool: &SqlitePool, product_id: &str) -> Result<bool, SqliteError> {
    let found: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM stock WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Sum of a product's quantity across all branches
pub async fn total_for_product(pool: &SqlitePool, product_id: &str) -> Result<i64, SqliteError> {
    let total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM stock WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;
    use crate::data::sqlite::repositories::{branch, product};

    async fn seed_pair(pool: &SqlitePool) -> (String, String) {
        let wine = product::create_product(pool, "Test Wine", None, None, None)
            .await
            .unwrap();
        let site = branch::create_branch(pool, "Main").await.unwrap();
        (wine.id, site.id)
    }

    #[tokio::test]
    async fn test_create_and_pair_lookup() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;

        create_stock(&pool, &wine, &site, 10).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let row = get_for_pair(&mut conn, &wine, &site).await.unwrap().unwrap();
        assert_eq!(row.quantity, 10);
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;

        create_stock(&pool, &wine, &site, 1).await.unwrap();
        let err = create_stock(&pool, &wine, &site, 2).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected_by_schema() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;

        let err = create_stock(&pool, &wine, &site, -1).await.unwrap_err();
        assert!(err.is_check_violation());
    }

    #[tokio::test]
    async fn test_ensure_row_creates_once() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let first = ensure_row(&mut conn, &wine, &site).await.unwrap();
        assert_eq!(first.quantity, 0);

        // Second ensure reuses the row, never duplicates
        let second = ensure_row(&mut conn, &wine, &site).await.unwrap();
        assert_eq!(second.id, first.id);

        drop(conn);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_ensure_row_keeps_existing_quantity() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;
        create_stock(&pool, &wine, &site, 7).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let row = ensure_row(&mut conn, &wine, &site).await.unwrap();
        assert_eq!(row.quantity, 7);
    }

    #[tokio::test]
    async fn test_try_decrement_sufficiency() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;
        create_stock(&pool, &wine, &site, 10).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(try_decrement(&mut conn, &wine, &site, 6).await.unwrap());
        assert!(!try_decrement(&mut conn, &wine, &site, 6).await.unwrap());

        let row = get_for_pair(&mut conn, &wine, &site).await.unwrap().unwrap();
        assert_eq!(row.quantity, 4);
    }

    #[tokio::test]
    async fn test_try_decrement_missing_row() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        assert!(!try_decrement(&mut conn, &wine, &site, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_increment() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;
        create_stock(&pool, &wine, &site, 3).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        increment(&mut conn, &wine, &site, 4).await.unwrap();

        let row = get_for_pair(&mut conn, &wine, &site).await.unwrap().unwrap();
        assert_eq!(row.quantity, 7);

        assert!(increment(&mut conn, "missing", &site, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_update_quantity_and_delete() {
        let pool = setup_test_pool().await;
        let (wine, site) = seed_pair(&pool).await;
        let row = create_stock(&pool, &wine, &site, 5).await.unwrap();

        let updated = update_quantity(&pool, &row.id, 0).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 0);

        assert!(update_quantity(&pool, "missing", 1).await.unwrap().is_none());

        assert!(delete_stock(&pool, &row.id).await.unwrap());
        assert!(get_stock(&pool, &row.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_stock_filtered() {
        let pool = setup_test_pool().await;
        let wine = product::create_product(&pool, "Filtered Wine", None, None, None)
            .await
            .unwrap();
        let a = branch::create_branch(&pool, "A").await.unwrap();
        let b = branch::create_branch(&pool, "B").await.unwrap();
        create_stock(&pool, &wine.id, &a.id, 1).await.unwrap();
        create_stock(&pool, &wine.id, &b.id, 2).await.unwrap();

        let (rows, total) = list_stock(&pool, &StockFilter::default(), 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let (rows, total) = list_stock(
            &pool,
            &StockFilter {
                branch_id: Some(a.id.clone()),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_total_for_product() {
        let pool = setup_test_pool().await;
        let wine = product::create_product(&pool, "Summed Wine", None, None, None)
            .await
            .unwrap();
        let a = branch::create_branch(&pool, "A").await.unwrap();
        let b = branch::create_branch(&pool, "B").await.unwrap();
        create_stock(&pool, &wine.id, &a.id, 4).await.unwrap();
        create_stock(&pool, &wine.id, &b.id, 6).await.unwrap();

        assert_eq!(total_for_product(&pool, &wine.id).await.unwrap(), 10);
        assert_eq!(total_for_product(&pool, "missing").await.unwrap(), 0);
    }
}
