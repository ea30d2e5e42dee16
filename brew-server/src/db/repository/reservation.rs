//! Reservation Repository
//!
//! Holds are keyed by the (client, recipe, package size) triple; the schema
//! enforces uniqueness, callers decide between insert, merge and replace.

use super::{RepoError, RepoResult};
use shared::models::{Reservation, ReservationDetail};
use sqlx::SqliteExecutor;

const COLUMNS: &str =
    "id, client_id, recipe_id, package_size_id, quantity, price, expires_at, created_at";

pub async fn find_by_id(
    ex: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Reservation>> {
    let hold = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(hold)
}

/// The hold for a (client, recipe, package size) triple, expired or not
pub async fn find_by_triple(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    recipe_id: i64,
    package_size_id: i64,
) -> RepoResult<Option<Reservation>> {
    let hold = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation
         WHERE client_id = ? AND recipe_id = ? AND package_size_id = ?"
    ))
    .bind(client_id)
    .bind(recipe_id)
    .bind(package_size_id)
    .fetch_optional(ex)
    .await?;
    Ok(hold)
}

/// Unexpired holds of a client
pub async fn find_active_by_client(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    now: i64,
) -> RepoResult<Vec<Reservation>> {
    let holds = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation
         WHERE client_id = ? AND expires_at > ? ORDER BY created_at"
    ))
    .bind(client_id)
    .bind(now)
    .fetch_all(ex)
    .await?;
    Ok(holds)
}

/// Unexpired holds of a client joined with recipe and package size, for the
/// cart view
pub async fn find_active_details(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    now: i64,
) -> RepoResult<Vec<ReservationDetail>> {
    let holds = sqlx::query_as::<_, ReservationDetail>(
        "SELECT rv.id, rv.client_id, rv.recipe_id, rc.name AS recipe_name,
                rv.package_size_id, ps.volume_ml, rv.quantity, rv.price, rv.expires_at
         FROM reservation rv
         JOIN recipe rc ON rc.id = rv.recipe_id
         JOIN package_size ps ON ps.id = rv.package_size_id
         WHERE rv.client_id = ? AND rv.expires_at > ?
         ORDER BY rv.created_at",
    )
    .bind(client_id)
    .bind(now)
    .fetch_all(ex)
    .await?;
    Ok(holds)
}

/// Detail row for a single hold (used by reserve/resize responses)
pub async fn find_detail_by_id(
    ex: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<ReservationDetail> {
    let hold = sqlx::query_as::<_, ReservationDetail>(
        "SELECT rv.id, rv.client_id, rv.recipe_id, rc.name AS recipe_name,
                rv.package_size_id, ps.volume_ml, rv.quantity, rv.price, rv.expires_at
         FROM reservation rv
         JOIN recipe rc ON rc.id = rv.recipe_id
         JOIN package_size ps ON ps.id = rv.package_size_id
         WHERE rv.id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    hold.ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

pub async fn insert(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    recipe_id: i64,
    package_size_id: i64,
    quantity: i64,
    price: f64,
    expires_at: i64,
    created_at: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO reservation (client_id, recipe_id, package_size_id, quantity, price, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(client_id)
    .bind(recipe_id)
    .bind(package_size_id)
    .bind(quantity)
    .bind(price)
    .bind(expires_at)
    .bind(created_at)
    .fetch_one(ex)
    .await?;
    Ok(id)
}

/// Set quantity and refresh expiry on an existing hold. The frozen price is
/// deliberately not touched.
pub async fn update_quantity(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    quantity: i64,
    expires_at: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE reservation SET quantity = ?, expires_at = ? WHERE id = ?")
        .bind(quantity)
        .bind(expires_at)
        .bind(id)
        .execute(ex)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }
    Ok(())
}

/// Reuse an expired hold's row as a brand-new hold (fresh quantity, price
/// and expiry). Keeps the unique triple satisfied without a delete+insert.
pub async fn replace(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    quantity: i64,
    price: f64,
    expires_at: i64,
    created_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE reservation SET quantity = ?, price = ?, expires_at = ?, created_at = ? WHERE id = ?",
    )
    .bind(quantity)
    .bind(price)
    .bind(expires_at)
    .bind(created_at)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Returns true if a row was deleted
pub async fn delete(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete all of a client's holds regardless of expiry; returns count
pub async fn delete_by_client(ex: impl SqliteExecutor<'_>, client_id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM reservation WHERE client_id = ?")
        .bind(client_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}

/// Refresh expiry on the client's unexpired holds; returns count affected
pub async fn extend_active(
    ex: impl SqliteExecutor<'_>,
    client_id: &str,
    expires_at: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows =
        sqlx::query("UPDATE reservation SET expires_at = ? WHERE client_id = ? AND expires_at > ?")
            .bind(expires_at)
            .bind(client_id)
            .bind(now)
            .execute(ex)
            .await?;
    Ok(rows.rows_affected())
}

/// Delete every hold whose expiry has passed (strict `<`); returns count
pub async fn delete_expired(ex: impl SqliteExecutor<'_>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM reservation WHERE expires_at < ?")
        .bind(now)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}
