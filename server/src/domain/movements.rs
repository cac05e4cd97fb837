//! Stock movement engine
//!
//! Orchestrates a transfer of product quantity between two branches: input
//! validation, referenced-entity checks, the ledger debit/credit pair, and
//! the append-only movement record. Everything runs inside one transaction;
//! an early return drops the transaction and rolls back, so a failed
//! transfer leaves no partial state.
//!
//! Origin sufficiency is enforced by the ledger's conditional decrement
//! (`UPDATE .. WHERE quantity >= ?`), so two racing transfers from the same
//! origin can never drive the balance negative, whichever interleaving the
//! storage layer picks.

use sqlx::SqlitePool;
use thiserror::Error;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::repositories::{branch, movement, product, stock, user};
use crate::data::types::MovementRow;

/// Input for a transfer. `user_id` is the authenticated actor, never taken
/// from the request body.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: String,
    pub quantity: i64,
    pub origin_branch_id: String,
    pub destination_branch_id: String,
    pub user_id: String,
    pub notes: Option<String>,
}

/// Transfer failure taxonomy. Every variant maps to a stable API error kind.
#[derive(Debug, Error)]
pub enum MovementError {
    #[error("Movement quantity must be positive")]
    InvalidQuantity,

    #[error("Origin and destination branch must differ")]
    SameBranch,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Origin branch not found: {0}")]
    OriginBranchNotFound(String),

    #[error("Destination branch not found: {0}")]
    DestinationBranchNotFound(String),

    #[error("Insufficient stock at origin branch")]
    InsufficientStock,

    #[error(transparent)]
    Storage(#[from] SqliteError),
}

/// Execute a transfer atomically.
///
/// Precondition checks run in a fixed order so callers get deterministic
/// error kinds; all of them happen inside the transaction that also applies
/// the ledger mutations and the movement insert.
pub async fn create_movement(
    pool: &SqlitePool,
    new: NewMovement,
) -> Result<MovementRow, MovementError> {
    if new.quantity <= 0 {
        return Err(MovementError::InvalidQuantity);
    }
    if new.origin_branch_id == new.destination_branch_id {
        return Err(MovementError::SameBranch);
    }

    let mut tx = pool.begin().await.map_err(SqliteError::from)?;

    if !user::exists(&mut *tx, &new.user_id).await? {
        return Err(MovementError::UserNotFound(new.user_id));
    }
    if !product::exists(&mut *tx, &new.product_id).await? {
        return Err(MovementError::ProductNotFound(new.product_id));
    }
    if !branch::exists(&mut *tx, &new.origin_branch_id).await? {
        return Err(MovementError::OriginBranchNotFound(new.origin_branch_id));
    }
    if !branch::exists(&mut *tx, &new.destination_branch_id).await? {
        return Err(MovementError::DestinationBranchNotFound(
            new.destination_branch_id,
        ));
    }

    // The conditional update both checks sufficiency and applies the debit;
    // a missing origin row and a short balance look the same to the caller.
    let debited = stock::try_decrement(
        &mut *tx,
        &new.product_id,
        &new.origin_branch_id,
        new.quantity,
    )
    .await?;
    if !debited {
        return Err(MovementError::InsufficientStock);
    }

    stock::ensure_row(&mut *tx, &new.product_id, &new.destination_branch_id).await?;
    stock::increment(
        &mut *tx,
        &new.product_id,
        &new.destination_branch_id,
        new.quantity,
    )
    .await?;

    let row = movement::insert(
        &mut *tx,
        &new.product_id,
        new.quantity,
        &new.origin_branch_id,
        &new.destination_branch_id,
        &new.user_id,
        new.notes.as_deref(),
    )
    .await?;

    tx.commit().await.map_err(SqliteError::from)?;

    tracing::info!(
        movement_id = %row.id,
        product_id = %row.product_id,
        quantity = row.quantity,
        origin = %row.origin_branch_id,
        destination = %row.destination_branch_id,
        "Movement created"
    );

    Ok(row)
}

/// List movements, newest first
pub async fn list_movements(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<MovementRow>, u64), SqliteError> {
    movement::list_movements(pool, page, limit).await
}
