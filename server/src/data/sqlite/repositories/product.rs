//! Product (wine) repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::ProductRow;

const PRODUCT_COLUMNS: &str = "id, name, vintage, region, grape_variety, created_at, updated_at";

/// Filters for the product listing
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name
    pub name: Option<String>,
    /// Case-insensitive substring match on region
    pub region: Option<String>,
    /// Exact vintage year
    pub vintage: Option<i64>,
}

/// Fields applied by a partial product update
#[derive(Debug, Default, Clone)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub vintage: Option<i64>,
    pub region: Option<String>,
    pub grape_variety: Option<String>,
}

/// Create a new product with a generated CUID2 ID
pub async fn create_product(
    pool: &SqlitePool,
    name: &str,
    vintage: Option<i64>,
    region: Option<&str>,
    grape_variety: Option<&str>,
) -> Result<ProductRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO products (id, name, vintage, region, grape_variety, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(vintage)
    .bind(region)
    .bind(grape_variety)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ProductRow {
        id,
        name: name.to_string(),
        vintage,
        region: region.map(String::from),
        grape_variety: grape_variety.map(String::from),
        created_at: now,
        updated_at: now,
    })
}

/// Get a product by ID
pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<ProductRow>, SqliteError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {} FROM products WHERE id = ?",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get a product by its unique name (uniqueness pre-check)
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<ProductRow>, SqliteError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {} FROM products WHERE name = ?",
        PRODUCT_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Check that a product id exists (transaction-scoped, used by the movement engine)
pub async fn exists(conn: &mut SqliteConnection, id: &str) -> Result<bool, SqliteError> {
    let found: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ProductFilter) {
    if let Some(name) = &filter.name {
        qb.push(" AND name LIKE ");
        qb.push_bind(format!("%{}%", name));
    }
    if let Some(region) = &filter.region {
        qb.push(" AND region LIKE ");
        qb.push_bind(format!("%{}%", region));
    }
    if let Some(vintage) = filter.vintage {
        qb.push(" AND vintage = ");
        qb.push_bind(vintage);
    }
}

/// List products with optional filters, name ascending
pub async fn list_products(
    pool: &SqlitePool,
    filter: &ProductFilter,
    page: u32,
    limit: u32,
) -> Result<(Vec<ProductRow>, u64), SqliteError> {
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM products WHERE 1=1",
        PRODUCT_COLUMNS
    ));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY name ASC LIMIT ");
    qb.push_bind(limit as i64);
    qb.push(" OFFSET ");
    qb.push_bind((page.saturating_sub(1) as i64) * limit as i64);

    let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok((rows, total as u64))
}

/// Apply a partial update, keeping untouched fields
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    update: ProductUpdate,
) -> Result<Option<ProductRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {} FROM products WHERE id = ?",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Ok(None);
    };

    let name = update.name.unwrap_or(current.name);
    let vintage = update.vintage.or(current.vintage);
    let region = update.region.or(current.region);
    let grape_variety = update.grape_variety.or(current.grape_variety);
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE products SET name = ?, vintage = ?, region = ?, grape_variety = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&name)
    .bind(vintage)
    .bind(&region)
    .bind(&grape_variety)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(ProductRow {
        id: id.to_string(),
        name,
        vintage,
        region,
        grape_variety,
        created_at: current.created_at,
        updated_at: now,
    }))
}

/// Delete a product by ID
pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
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
    async fn test_create_and_get_product() {
        let pool = setup_test_pool().await;
        let wine = create_product(&pool, "Rioja Reserva", Some(2018), Some("Rioja"), Some("Tempranillo"))
            .await
            .unwrap();

        let fetched = get_product(&pool, &wine.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Rioja Reserva");
        assert_eq!(fetched.vintage, Some(2018));
        assert_eq!(fetched.grape_variety, Some("Tempranillo".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = setup_test_pool().await;
        create_product(&pool, "Malbec", None, None, None).await.unwrap();
        let err = create_product(&pool, "Malbec", None, None, None)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_products_filters() {
        let pool = setup_test_pool().await;
        create_product(&pool, "Mendoza Malbec", Some(2020), Some("Mendoza"), None)
            .await
            .unwrap();
        create_product(&pool, "Rioja Crianza", Some(2019), Some("Rioja"), None)
            .await
            .unwrap();
        create_product(&pool, "Rioja Gran Reserva", Some(2015), Some("Rioja"), None)
            .await
            .unwrap();

        let (rows, total) = list_products(
            &pool,
            &ProductFilter {
                region: Some("Rioja".to_string()),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let (rows, total) = list_products(
            &pool,
            &ProductFilter {
                vintage: Some(2020),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Mendoza Malbec");

        let (rows, _) = list_products(
            &pool,
            &ProductFilter {
                name: Some("Reserva".to_string()),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let pool = setup_test_pool().await;
        let wine = create_product(&pool, "Old Name", Some(2017), None, None)
            .await
            .unwrap();

        let updated = update_product(
            &pool,
            &wine.id,
            ProductUpdate {
                name: Some("New Name".to_string()),
                region: Some("Priorat".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.vintage, Some(2017));
        assert_eq!(updated.region, Some("Priorat".to_string()));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let pool = setup_test_pool().await;
        let wine = create_product(&pool, "Short Lived", None, None, None)
            .await
            .unwrap();
        assert!(delete_product(&pool, &wine.id).await.unwrap());
        assert!(get_product(&pool, &wine.id).await.unwrap().is_none());
    }
}
