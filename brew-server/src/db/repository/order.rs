//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderLineDetail, OrderStatus};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, client_id, amount, status, created_at";

pub async fn insert(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    amount: f64,
    status: OrderStatus,
    created_at: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (client_id, amount, status, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(client_id)
    .bind(amount)
    .bind(status)
    .bind(created_at)
    .fetch_one(ex)
    .await?;
    Ok(id)
}

/// Add allocated quantity to an order line, merging with an existing line
/// for the same (order, batch, package size) triple. The price of the first
/// write wins; lines produced by one hold all carry that hold's frozen price.
pub async fn upsert_line(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    batch_id: i64,
    package_size_id: i64,
    quantity: i64,
    price: f64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_line (order_id, batch_id, package_size_id, quantity, price)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (order_id, batch_id, package_size_id)
         DO UPDATE SET quantity = quantity + excluded.quantity",
    )
    .bind(order_id)
    .bind(batch_id)
    .bind(package_size_id)
    .bind(quantity)
    .bind(price)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?;
    Ok(order)
}

pub async fn find_by_client(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE client_id = ? ORDER BY created_at DESC"
    ))
    .bind(client_id)
    .fetch_all(ex)
    .await?;
    Ok(orders)
}

pub async fn find_all(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC"
    ))
    .fetch_all(ex)
    .await?;
    Ok(orders)
}

/// Lines of an order joined with batch and recipe data
pub async fn find_lines(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<OrderLineDetail>> {
    let lines = sqlx::query_as::<_, OrderLineDetail>(
        "SELECT ol.id, ol.order_id, ol.batch_id, b.recipe_id, rc.name AS recipe_name,
                ol.package_size_id, ps.volume_ml, ol.quantity, ol.price
         FROM order_line ol
         JOIN batch b ON b.id = ol.batch_id
         JOIN recipe rc ON rc.id = b.recipe_id
         JOIN package_size ps ON ps.id = ol.package_size_id
         WHERE ol.order_id = ?
         ORDER BY ol.id",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await?;
    Ok(lines)
}

pub async fn update_status(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(ex)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}
