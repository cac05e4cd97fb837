//! User repository for SQLite operations
//!
//! Password hashes are produced by callers (`utils::password`); this module
//! only ever sees the hash.

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{Role, UserRow};

type UserTuple = (
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    i64,
    i64,
);

const USER_COLUMNS: &str =
    "id, username, name, email, password_hash, role, created_at, updated_at";

fn row_from_tuple(t: UserTuple) -> UserRow {
    let (id, username, name, email, password_hash, role, created_at, updated_at) = t;
    UserRow {
        id,
        username,
        name,
        email,
        password_hash,
        role: Role::from_db(&role),
        created_at,
        updated_at,
    }
}

/// Fields applied by a partial user update; absent fields keep their value
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Create a new user with a generated CUID2 ID
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    name: &str,
    email: Option<&str>,
    password_hash: &str,
    role: Role,
) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, username, name, email, password_hash, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserRow {
        id,
        username: username.to_string(),
        name: name.to_string(),
        email: email.map(String::from),
        password_hash: password_hash.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_from_tuple))
}

/// Get a user by username (login lookup)
pub async fn get_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_from_tuple))
}

/// Get a user by email (uniqueness pre-check)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_from_tuple))
}

/// Check that a user id exists (transaction-scoped, used by the movement engine)
pub async fn exists(conn: &mut SqliteConnection, id: &str) -> Result<bool, SqliteError> {
    let found: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

/// List users, username ascending
pub async fn list_users(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<UserRow>, u64), SqliteError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let offset = (page.saturating_sub(1) as i64) * limit as i64;
    let rows = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {} FROM users ORDER BY username ASC LIMIT ? OFFSET ?",
        USER_COLUMNS
    ))
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows.into_iter().map(row_from_tuple).collect(), total as u64))
}

/// Apply a partial update, keeping untouched fields.
///
/// Runs in a transaction so the read-merge-write is atomic; unique
/// constraints on username/email still backstop concurrent updates.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: UserUpdate,
) -> Result<Option<UserRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current.map(row_from_tuple) else {
        return Ok(None);
    };

    let name = update.name.unwrap_or(current.name);
    let email = update.email.or(current.email);
    let password_hash = update.password_hash.unwrap_or(current.password_hash);
    let role = update.role.unwrap_or(current.role);
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE users SET name = ?, email = ?, password_hash = ?, role = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(UserRow {
        id: id.to_string(),
        username: current.username,
        name,
        email,
        password_hash,
        role,
        created_at: current.created_at,
        updated_at: now,
    }))
}

/// Delete a user by ID
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Check whether any movement references this user (delete guard)
pub async fn has_movements(pool: &SqlitePool, user_id: &str) -> Result<bool, SqliteError> {
    let found: bool =
        sqlx::query_scalar("SELECT COUNT(*) > 0 FROM movements WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::test_support::setup_test_pool;

    #[tokio::test]
    async fn test_create_user() {
        let pool = setup_test_pool().await;
        let user = create_user(
            &pool,
            "maria",
            "Maria Lopez",
            Some("maria@example.com"),
            "$argon2id$fake",
            Role::User,
        )
        .await
        .unwrap();

        assert!(!user.id.is_empty());
        assert_eq!(user.username, "maria");
        assert_eq!(user.email, Some("maria@example.com".to_string()));
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let pool = setup_test_pool().await;
        create_user(&pool, "maria", "Maria", None, "h", Role::User)
            .await
            .unwrap();
        let err = create_user(&pool, "maria", "Other Maria", None, "h", Role::User)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_get_user_and_by_username() {
        let pool = setup_test_pool().await;
        let created = create_user(&pool, "admin2", "Admin Two", None, "h", Role::Admin)
            .await
            .unwrap();

        let by_id = get_user(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(by_id.role, Role::Admin);

        let by_name = get_by_username(&pool, "admin2").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(get_user(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let pool = setup_test_pool().await;
        let user = create_user(
            &pool,
            "jon",
            "Jon",
            Some("jon@example.com"),
            "old-hash",
            Role::User,
        )
        .await
        .unwrap();

        let updated = update_user(
            &pool,
            &user.id,
            UserUpdate {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name, "Jon");
        assert_eq!(updated.email, Some("jon@example.com".to_string()));
        assert_eq!(updated.password_hash, "old-hash");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let pool = setup_test_pool().await;
        let updated = update_user(&pool, "nope", UserUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let pool = setup_test_pool().await;
        let user = create_user(&pool, "temp", "Temp", None, "h", Role::User)
            .await
            .unwrap();

        assert!(delete_user(&pool, &user.id).await.unwrap());
        assert!(!delete_user(&pool, &user.id).await.unwrap());
        assert!(get_user(&pool, &user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists() {
        let pool = setup_test_pool().await;
        let user = create_user(&pool, "ex", "Ex", None, "h", Role::User)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(exists(&mut conn, &user.id).await.unwrap());
        assert!(!exists(&mut conn, "missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_users_pagination() {
        let pool = setup_test_pool().await;
        for i in 0..5 {
            create_user(&pool, &format!("user{}", i), "U", None, "h", Role::User)
                .await
                .unwrap();
        }

        let (rows, total) = list_users(&pool, 1, 3).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 3);

        let (rows, _) = list_users(&pool, 2, 3).await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
