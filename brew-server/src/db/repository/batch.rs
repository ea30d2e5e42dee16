//! Batch Repository
//!
//! Physical stock queries for the checkout allocator. Allocation rows come
//! back ordered oldest production date first so the caller can do a simple
//! greedy fill.

use super::{RepoError, RepoResult};
use sqlx::SqliteExecutor;

/// One allocatable slice of physical stock
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AllocatableStock {
    pub stock_id: i64,
    pub batch_id: i64,
    pub quantity: i64,
    pub brewed_at: i64,
}

/// Non-empty stock rows for a (recipe, package size), oldest batch first.
/// Ties on `brewed_at` break by batch id for a stable order.
pub async fn find_for_allocation(
    ex: impl SqliteExecutor<'_>,
    recipe_id: i64,
    package_size_id: i64,
) -> RepoResult<Vec<AllocatableStock>> {
    let rows = sqlx::query_as::<_, AllocatableStock>(
        "SELECT bs.id AS stock_id, bs.batch_id, bs.quantity, b.brewed_at
         FROM batch_stock bs
         JOIN batch b ON b.id = bs.batch_id
         WHERE b.recipe_id = ? AND bs.package_size_id = ? AND bs.quantity > 0
         ORDER BY b.brewed_at ASC, b.id ASC",
    )
    .bind(recipe_id)
    .bind(package_size_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Decrement one stock row, guarded so physical quantity can never go
/// negative even if the caller's arithmetic is wrong.
pub async fn decrement_stock(
    ex: impl SqliteExecutor<'_>,
    stock_id: i64,
    amount: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE batch_stock SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?1")
        .bind(amount)
        .bind(stock_id)
        .execute(ex)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation(format!(
            "Stock row {stock_id} has fewer than {amount} units"
        )));
    }
    Ok(())
}
