//! Startup seeding
//!
//! Creates the default admin user and the default OAuth client on first run.
//! Both are idempotent: existing records are left untouched.

use anyhow::Result;
use sqlx::SqlitePool;

use super::repositories::{oauth_client, user};
use crate::core::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_OAUTH_CLIENT_ID,
    DEFAULT_OAUTH_CLIENT_SECRET, ENV_ADMIN_PASSWORD,
};
use crate::data::types::Role;
use crate::utils::password;

/// Run all seeders
pub async fn run(pool: &SqlitePool) -> Result<()> {
    seed_admin_user(pool).await?;
    seed_default_oauth_client(pool).await?;
    Ok(())
}

/// Seed the default admin user if it doesn't exist
async fn seed_admin_user(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("Checking for existing admin user");
    if user::get_by_username(pool, DEFAULT_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        tracing::debug!("Admin user already exists, skipping seed");
        return Ok(());
    }

    let admin_password = match std::env::var(ENV_ADMIN_PASSWORD) {
        Ok(p) if !p.is_empty() => p,
        _ => {
            tracing::warn!(
                "{} not set, seeding admin with the default password. Change it before exposing the server.",
                ENV_ADMIN_PASSWORD
            );
            DEFAULT_ADMIN_PASSWORD.to_string()
        }
    };

    let hash = password::hash(&admin_password)?;
    let admin = user::create_user(
        pool,
        DEFAULT_ADMIN_USERNAME,
        "Super Admin",
        Some("admin@example.com"),
        &hash,
        Role::Admin,
    )
    .await?;

    tracing::info!(user_id = %admin.id, "Default admin user created");
    Ok(())
}

/// Seed the default OAuth client if it doesn't exist
async fn seed_default_oauth_client(pool: &SqlitePool) -> Result<()> {
    if oauth_client::get_by_client_id(pool, DEFAULT_OAUTH_CLIENT_ID)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let hash = password::hash(DEFAULT_OAUTH_CLIENT_SECRET)?;
    oauth_client::create_oauth_client(pool, DEFAULT_OAUTH_CLIENT_ID, &hash, "Default OAuth Client")
        .await?;

    tracing::info!(client_id = DEFAULT_OAUTH_CLIENT_ID, "Default OAuth client seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = setup_test_pool().await;
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(admins, 1);

        let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM oauth_clients")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(clients, 1);
    }

    #[tokio::test]
    async fn test_seeded_admin_credentials_verify() {
        let pool = setup_test_pool().await;
        run(&pool).await.unwrap();

        let admin = user::get_by_username(&pool, DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(password::verify(&admin.password_hash, DEFAULT_ADMIN_PASSWORD));
    }
}
