//! Stock Ledger
//!
//! Availability is derived, never stored: physical batch quantity minus
//! unexpired holds. Callers that are about to decide on the result must run
//! the read inside the same transaction as their write, so the executor is
//! always passed in.

use shared::BusMessage;
use shared::models::StockLevel;
use shared::util::now_millis;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::db::repository::{RepoResult, stats};
use crate::message::MessageBus;

/// Units of a (recipe, package size) a new hold could still claim.
/// Never negative; an existing hold's own quantity is already subtracted,
/// which is why increase paths only check their delta against this.
pub async fn available_quantity(
    ex: impl SqliteExecutor<'_>,
    recipe_id: i64,
    package_size_id: i64,
    now: i64,
) -> RepoResult<i64> {
    let available = sqlx::query_scalar::<_, i64>(
        "SELECT MAX(0,
            (SELECT COALESCE(SUM(bs.quantity), 0)
             FROM batch_stock bs JOIN batch b ON b.id = bs.batch_id
             WHERE b.recipe_id = ?1 AND bs.package_size_id = ?2)
          - (SELECT COALESCE(SUM(r.quantity), 0)
             FROM reservation r
             WHERE r.recipe_id = ?1 AND r.package_size_id = ?2 AND r.expires_at > ?3))",
    )
    .bind(recipe_id)
    .bind(package_size_id)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(available)
}

/// Full availability table, one row per (recipe, package size) that has ever
/// been stocked
pub async fn stock_snapshot(
    ex: impl SqliteExecutor<'_>,
    now: i64,
) -> RepoResult<Vec<StockLevel>> {
    let levels = sqlx::query_as::<_, StockLevel>(
        "SELECT b.recipe_id AS recipe_id, bs.package_size_id AS package_size_id,
                MAX(0, SUM(bs.quantity) - COALESCE(
                    (SELECT SUM(r.quantity) FROM reservation r
                     WHERE r.recipe_id = b.recipe_id
                       AND r.package_size_id = bs.package_size_id
                       AND r.expires_at > ?1), 0)) AS available
         FROM batch_stock bs
         JOIN batch b ON b.id = bs.batch_id
         GROUP BY b.recipe_id, bs.package_size_id
         ORDER BY b.recipe_id, bs.package_size_id",
    )
    .bind(now)
    .fetch_all(ex)
    .await?;
    Ok(levels)
}

/// Push a fresh stock snapshot to all observers. Called after a
/// ledger-affecting transaction has committed; failures are logged, never
/// propagated into the already-committed operation.
pub async fn broadcast_stock(pool: &SqlitePool, bus: &MessageBus) {
    match stock_snapshot(pool, now_millis()).await {
        Ok(levels) => bus.publish(BusMessage::StockUpdate(levels)).await,
        Err(e) => tracing::warn!(error = %e, "Failed to build stock snapshot for broadcast"),
    }
}

/// Push fresh aggregate statistics to all observers
pub async fn broadcast_stats(pool: &SqlitePool, bus: &MessageBus) {
    match stats::snapshot(pool).await {
        Ok(stats) => bus.publish(BusMessage::StatsUpdate(stats)).await,
        Err(e) => tracing::warn!(error = %e, "Failed to build stats snapshot for broadcast"),
    }
}
