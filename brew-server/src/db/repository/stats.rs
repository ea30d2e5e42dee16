//! Aggregate statistics for the STATS_UPDATE broadcast

use super::RepoResult;
use shared::message::StatsPayload;
use sqlx::SqlitePool;

pub async fn snapshot(pool: &SqlitePool) -> RepoResult<StatsPayload> {
    let recipe_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe")
        .fetch_one(pool)
        .await?;

    // Lifetime production, independent of what has since been sold
    let total_ml = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(bs.initial_quantity * ps.volume_ml), 0)
         FROM batch_stock bs
         JOIN package_size ps ON ps.id = bs.package_size_id",
    )
    .fetch_one(pool)
    .await?;

    let order_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    Ok(StatsPayload {
        recipe_count,
        total_liters_produced: total_ml as f64 / 1000.0,
        order_count,
    })
}
