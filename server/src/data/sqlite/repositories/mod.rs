//! SQLite repositories
//!
//! Row types (UserRow, StockRow, etc.) should be imported from `crate::data::types`.

pub mod branch;
pub mod client;
pub mod movement;
pub mod oauth_client;
pub mod product;
pub mod stock;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support {
    use std::str::FromStr;

    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use crate::data::sqlite::schema::SCHEMA;

    /// In-memory pool with the full schema applied. Pinned to a single
    /// connection so the memory database is shared by every query;
    /// concurrency tests use a file-backed pool instead (see
    /// domain::movements tests).
    pub async fn setup_test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str(":memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        pool
    }
}
