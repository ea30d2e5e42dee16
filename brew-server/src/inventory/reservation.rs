//! Reservation Manager
//!
//! Creates, resizes, extends and expires time-limited holds. Every mutation
//! runs in one transaction and re-checks availability inside it; the
//! pre-transaction state a client saw is never trusted.

use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::{client, package_size, recipe, reservation};
use crate::inventory::ledger;
use crate::message::MessageBus;
use shared::models::Reservation;

/// How long a hold lives without being refreshed (15 minutes)
pub const HOLD_TTL_MS: i64 = 15 * 60 * 1000;

/// Result of an extend-cart operation
#[derive(Debug, Clone, Copy)]
pub struct ExtendedHolds {
    pub count: u64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct ReservationService {
    pool: SqlitePool,
    bus: MessageBus,
    hold_ttl_ms: i64,
}

impl ReservationService {
    pub fn new(pool: SqlitePool, bus: MessageBus) -> Self {
        Self::with_ttl(pool, bus, HOLD_TTL_MS)
    }

    pub fn with_ttl(pool: SqlitePool, bus: MessageBus, hold_ttl_ms: i64) -> Self {
        Self {
            pool,
            bus,
            hold_ttl_ms,
        }
    }

    /// Create a hold, or increase the client's existing hold for the same
    /// (recipe, package size).
    ///
    /// Availability is checked against the requested quantity only: an
    /// existing hold is already subtracted by the ledger, so the request is
    /// exactly the incremental delta. The price is frozen at first creation
    /// and survives later increases.
    pub async fn create_or_increase(
        &self,
        client_id: &str,
        recipe_id: i64,
        package_size_id: i64,
        quantity: i64,
    ) -> AppResult<Reservation> {
        if client_id.trim().is_empty() {
            return Err(AppError::validation("clientId is required"));
        }
        if quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }

        let now = now_millis();
        let expires_at = now + self.hold_ttl_ms;

        // Write lock up front: contenders queue here and re-read fresh
        // availability instead of failing on a stale snapshot
        let mut tx = crate::db::write_tx(&self.pool).await?;

        let recipe = recipe::find_by_id(&mut *tx, recipe_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RecipeNotFound,
                    format!("Recipe {recipe_id} not found"),
                )
            })?;
        let package = package_size::find_by_id(&mut *tx, package_size_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::PackageSizeNotFound,
                    format!("Package size {package_size_id} not found"),
                )
            })?;
        if client::find_by_id(&mut *tx, client_id).await?.is_none() {
            return Err(AppError::validation(format!("Unknown client {client_id}")));
        }

        let available =
            ledger::available_quantity(&mut *tx, recipe_id, package_size_id, now).await?;
        if quantity > available {
            return Err(AppError::insufficient_stock(&recipe.name, available));
        }

        let existing =
            reservation::find_by_triple(&mut *tx, client_id, recipe_id, package_size_id).await?;
        let id = match existing {
            Some(hold) if !hold.is_expired(now) => {
                reservation::update_quantity(&mut *tx, hold.id, hold.quantity + quantity, expires_at)
                    .await?;
                hold.id
            }
            Some(stale) => {
                // Expired but not yet reaped: treat as a brand-new hold,
                // repricing at the current catalog price
                let price = package.unit_price(recipe.base_price);
                reservation::replace(&mut *tx, stale.id, quantity, price, expires_at, now).await?;
                stale.id
            }
            None => {
                let price = package.unit_price(recipe.base_price);
                reservation::insert(
                    &mut *tx,
                    client_id,
                    recipe_id,
                    package_size_id,
                    quantity,
                    price,
                    expires_at,
                    now,
                )
                .await?
            }
        };

        let hold = reservation::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Reservation vanished inside transaction"))?;
        tx.commit().await?;

        ledger::broadcast_stock(&self.pool, &self.bus).await;
        Ok(hold)
    }

    /// Set an existing hold to an absolute quantity, refreshing its expiry
    pub async fn set_quantity(&self, hold_id: i64, quantity: i64) -> AppResult<Reservation> {
        if quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }

        let now = now_millis();
        let expires_at = now + self.hold_ttl_ms;

        let mut tx = crate::db::write_tx(&self.pool).await?;

        let hold = reservation::find_by_id(&mut *tx, hold_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ReservationNotFound,
                    format!("Reservation {hold_id} not found"),
                )
            })?;
        if hold.is_expired(now) {
            return Err(AppError::reservation_expired(hold_id));
        }

        // Only the growth has to fit: the hold's current quantity is already
        // subtracted from availability
        let delta = quantity - hold.quantity;
        if delta > 0 {
            let available =
                ledger::available_quantity(&mut *tx, hold.recipe_id, hold.package_size_id, now)
                    .await?;
            if delta > available {
                let recipe = recipe::find_by_id(&mut *tx, hold.recipe_id).await?;
                let name = recipe.map_or_else(|| hold.recipe_id.to_string(), |r| r.name);
                return Err(AppError::insufficient_stock(name, available));
            }
        }

        reservation::update_quantity(&mut *tx, hold_id, quantity, expires_at).await?;
        let updated = reservation::find_by_id(&mut *tx, hold_id)
            .await?
            .ok_or_else(|| AppError::internal("Reservation vanished inside transaction"))?;
        tx.commit().await?;

        ledger::broadcast_stock(&self.pool, &self.bus).await;
        Ok(updated)
    }

    /// Remove one hold
    pub async fn remove(&self, hold_id: i64) -> AppResult<()> {
        if !reservation::delete(&self.pool, hold_id).await? {
            return Err(AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("Reservation {hold_id} not found"),
            ));
        }
        ledger::broadcast_stock(&self.pool, &self.bus).await;
        Ok(())
    }

    /// Remove all of a client's holds, expired or not
    pub async fn clear_client(&self, client_id: &str) -> AppResult<u64> {
        let removed = reservation::delete_by_client(&self.pool, client_id).await?;
        ledger::broadcast_stock(&self.pool, &self.bus).await;
        Ok(removed)
    }

    /// Refresh expiry on all of a client's unexpired holds. Quantities and
    /// prices are untouched, so no stock broadcast is needed.
    pub async fn extend_client(&self, client_id: &str) -> AppResult<ExtendedHolds> {
        let now = now_millis();
        let expires_at = now + self.hold_ttl_ms;
        let count = reservation::extend_active(&self.pool, client_id, expires_at, now).await?;
        Ok(ExtendedHolds { count, expires_at })
    }

    /// Delete every expired hold; broadcasts stock only when rows were
    /// actually removed. Invoked by the reaper.
    pub async fn expire_stale(&self) -> AppResult<u64> {
        let removed = reservation::delete_expired(&self.pool, now_millis()).await?;
        if removed > 0 {
            tracing::info!(removed, "Expired stale reservations");
            ledger::broadcast_stock(&self.pool, &self.bus).await;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::testutil::*;
    use shared::BusMessage;

    async fn service() -> (ReservationService, SqlitePool, MessageBus) {
        let pool = test_pool().await;
        let bus = MessageBus::new();
        insert_client(&pool, "c1").await;
        insert_client(&pool, "c2").await;
        insert_recipe(&pool, 1, "Blonde", 4.5).await;
        insert_package_size(&pool, 10, 330).await;
        insert_package_size(&pool, 20, 750).await;
        insert_batch(&pool, 100, 1, 1_000).await;
        insert_stock(&pool, 100, 10, 5).await;
        insert_stock(&pool, 100, 20, 5).await;
        (
            ReservationService::new(pool.clone(), bus.clone()),
            pool,
            bus,
        )
    }

    #[tokio::test]
    async fn repeat_reservation_merges_and_keeps_first_price() {
        let (svc, pool, _bus) = service().await;

        let first = svc.create_or_increase("c1", 1, 10, 2).await.unwrap();
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, 4.5);

        // Catalog price changes after the first hold
        sqlx::query("UPDATE recipe SET base_price = 9.0 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let merged = svc.create_or_increase("c1", 1, 10, 1).await.unwrap();
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.price, 4.5, "price must stay frozen");
        assert!(merged.expires_at >= first.expires_at);
    }

    #[tokio::test]
    async fn holds_for_different_packages_are_independent() {
        let (svc, _pool, _bus) = service().await;

        let bottle = svc.create_or_increase("c1", 1, 10, 1).await.unwrap();
        let magnum = svc.create_or_increase("c1", 1, 20, 1).await.unwrap();
        assert_ne!(bottle.id, magnum.id);
        assert_eq!(magnum.price, 10.23); // 4.50 * 750 / 330
    }

    #[tokio::test]
    async fn reservation_fails_when_stock_is_short() {
        let (svc, _pool, _bus) = service().await;

        svc.create_or_increase("c1", 1, 10, 4).await.unwrap();
        let err = svc.create_or_increase("c2", 1, 10, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.details.unwrap()["available"], serde_json::json!(1));
    }

    #[tokio::test]
    async fn invalid_inputs_are_rejected() {
        let (svc, _pool, _bus) = service().await;

        let err = svc.create_or_increase("c1", 1, 10, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = svc.create_or_increase("ghost", 1, 10, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = svc.create_or_increase("c1", 99, 10, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RecipeNotFound);

        let err = svc.create_or_increase("c1", 1, 99, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PackageSizeNotFound);
    }

    #[tokio::test]
    async fn set_quantity_checks_only_the_delta() {
        let (svc, _pool, _bus) = service().await;

        let hold = svc.create_or_increase("c1", 1, 10, 3).await.unwrap();

        // 3 held, 2 free: growing to 5 consumes exactly the remainder
        let grown = svc.set_quantity(hold.id, 5).await.unwrap();
        assert_eq!(grown.quantity, 5);

        // One more unit does not exist
        let err = svc.set_quantity(hold.id, 6).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // Shrinking is always allowed
        let shrunk = svc.set_quantity(hold.id, 1).await.unwrap();
        assert_eq!(shrunk.quantity, 1);
        assert_eq!(shrunk.price, 4.5);
    }

    #[tokio::test]
    async fn expired_hold_cannot_be_resized() {
        let (svc, pool, _bus) = service().await;

        let hold = svc.create_or_increase("c1", 1, 10, 2).await.unwrap();
        sqlx::query("UPDATE reservation SET expires_at = 1 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = svc.set_quantity(hold.id, 3).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationExpired);
    }

    #[tokio::test]
    async fn reserving_over_a_stale_hold_reprices() {
        let (svc, pool, _bus) = service().await;

        let hold = svc.create_or_increase("c1", 1, 10, 2).await.unwrap();
        sqlx::query("UPDATE reservation SET expires_at = 1 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE recipe SET base_price = 6.0 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let fresh = svc.create_or_increase("c1", 1, 10, 1).await.unwrap();
        assert_eq!(fresh.id, hold.id, "row is reused");
        assert_eq!(fresh.quantity, 1, "stale quantity is not merged");
        assert_eq!(fresh.price, 6.0, "stale price is not kept");
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let (svc, _pool, _bus) = service().await;

        let hold = svc.create_or_increase("c1", 1, 10, 1).await.unwrap();
        svc.remove(hold.id).await.unwrap();
        let err = svc.remove(hold.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);

        svc.create_or_increase("c1", 1, 10, 1).await.unwrap();
        svc.create_or_increase("c1", 1, 20, 1).await.unwrap();
        assert_eq!(svc.clear_client("c1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn extend_refreshes_expiry_and_nothing_else() {
        let (svc, pool, _bus) = service().await;

        let hold = svc.create_or_increase("c1", 1, 10, 2).await.unwrap();
        sqlx::query("UPDATE reservation SET expires_at = expires_at - 60000 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();

        let extended = svc.extend_client("c1").await.unwrap();
        assert_eq!(extended.count, 1);

        // Repeat extends stay idempotent on quantity and price
        let again = svc.extend_client("c1").await.unwrap();
        assert_eq!(again.count, 1);

        let refreshed = crate::db::repository::reservation::find_by_id(&pool, hold.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.quantity, 2);
        assert_eq!(refreshed.price, 4.5);
        assert!(refreshed.expires_at >= extended.expires_at);

        // Expired holds are not revived
        sqlx::query("UPDATE reservation SET expires_at = 1 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(svc.extend_client("c1").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn reaper_sweep_broadcasts_once_per_effective_run() {
        let (svc, pool, bus) = service().await;
        let mut rx = bus.subscribe();

        let hold = svc.create_or_increase("c1", 1, 10, 2).await.unwrap();
        rx.recv().await.unwrap(); // stock broadcast from the reserve

        sqlx::query("UPDATE reservation SET expires_at = 1 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(svc.expire_stale().await.unwrap(), 1);
        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, BusMessage::StockUpdate(_)));

        // Nothing left to expire: no broadcast
        assert_eq!(svc.expire_stale().await.unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn last_unit_contention_yields_exactly_one_winner() {
        // File-backed pool with multiple connections, so the two reserves
        // really run on separate write transactions
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("contention.db");
        let db = crate::db::DbService::new(&db_path.to_string_lossy())
            .await
            .unwrap();
        let pool = db.pool;

        insert_client(&pool, "c1").await;
        insert_client(&pool, "c2").await;
        insert_recipe(&pool, 1, "Blonde", 4.5).await;
        insert_package_size(&pool, 10, 330).await;
        insert_batch(&pool, 100, 1, 1_000).await;
        insert_stock(&pool, 100, 10, 1).await;

        let svc = ReservationService::new(pool.clone(), MessageBus::new());
        let (first, second) = tokio::join!(
            svc.create_or_increase("c1", 1, 10, 1),
            svc.create_or_increase("c2", 1, 10, 1),
        );

        let (won, lost) = match (first, second) {
            (Ok(hold), Err(e)) => (hold, e),
            (Err(e), Ok(hold)) => (hold, e),
            (Ok(_), Ok(_)) => panic!("both reserves took the last unit"),
            (Err(a), Err(b)) => panic!("both reserves failed: {a}; {b}"),
        };
        assert_eq!(won.quantity, 1);
        assert_eq!(lost.code, ErrorCode::InsufficientStock);
        assert_eq!(lost.details.unwrap()["available"], serde_json::json!(0));
    }

    #[tokio::test]
    async fn availability_stays_non_negative_through_mixed_operations() {
        let (svc, pool, _bus) = service().await;

        svc.create_or_increase("c1", 1, 10, 3).await.unwrap();
        svc.create_or_increase("c2", 1, 10, 2).await.unwrap();
        assert!(svc.create_or_increase("c1", 1, 10, 1).await.is_err());

        let now = now_millis();
        let available = ledger::available_quantity(&pool, 1, 10, now).await.unwrap();
        assert_eq!(available, 0);

        svc.clear_client("c2").await.unwrap();
        let available = ledger::available_quantity(&pool, 1, 10, now).await.unwrap();
        assert_eq!(available, 2);
    }
}
