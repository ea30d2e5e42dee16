//! Checkout Engine
//!
//! Converts a client's active holds into a paid-pending order in one
//! all-or-nothing transaction: price the cart, allocate physical stock
//! oldest batch first, decrement it, write order lines, drop the holds.
//! Any shortfall aborts the whole checkout and leaves the holds intact.

use shared::util::{now_millis, round2};
use shared::{AppError, AppResult};
use sqlx::SqlitePool;

use crate::db::repository::{batch, order, recipe, reservation};
use crate::inventory::ledger;
use crate::message::MessageBus;
use shared::message::OrderEventPayload;
use shared::models::{Order, OrderLineDetail, OrderStatus};
use shared::BusMessage;

/// A completed checkout: the order header plus its allocated lines
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub lines: Vec<OrderLineDetail>,
}

#[derive(Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
    bus: MessageBus,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool, bus: MessageBus) -> Self {
        Self { pool, bus }
    }

    /// Place an order from the client's active holds.
    ///
    /// `custom_amount` lets a client round the bill up (a tip). Amounts below
    /// the calculated total are clamped to it, never honored.
    pub async fn checkout(
        &self,
        client_id: &str,
        custom_amount: Option<f64>,
    ) -> AppResult<PlacedOrder> {
        let now = now_millis();

        // Write lock up front so concurrent checkouts and reserves serialize
        // instead of failing on stale snapshots
        let mut tx = crate::db::write_tx(&self.pool).await?;

        let holds = reservation::find_active_by_client(&mut *tx, client_id, now).await?;
        if holds.is_empty() {
            return Err(AppError::empty_cart());
        }

        let calculated = round2(
            holds
                .iter()
                .map(|h| h.price * h.quantity as f64)
                .sum::<f64>(),
        );
        let amount = match custom_amount {
            Some(custom) if custom >= calculated => round2(custom),
            Some(custom) => {
                tracing::warn!(
                    client = client_id,
                    requested = custom,
                    calculated,
                    "Custom amount below cart total, clamping"
                );
                calculated
            }
            None => calculated,
        };

        let order_id =
            order::insert(&mut *tx, client_id, amount, OrderStatus::PendingPayment, now).await?;

        // Greedy fill, oldest batch first. Ledger availability was proven at
        // hold time but physical rows may have shifted since, so the loop
        // re-verifies against real batch_stock quantities.
        for hold in &holds {
            let mut remaining = hold.quantity;
            let slices =
                batch::find_for_allocation(&mut *tx, hold.recipe_id, hold.package_size_id)
                    .await?;
            for slice in slices {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(slice.quantity);
                batch::decrement_stock(&mut *tx, slice.stock_id, take).await?;
                order::upsert_line(
                    &mut *tx,
                    order_id,
                    slice.batch_id,
                    hold.package_size_id,
                    take,
                    hold.price,
                )
                .await?;
                remaining -= take;
            }
            if remaining > 0 {
                // Dropping the transaction rolls everything back
                let name = recipe::find_by_id(&mut *tx, hold.recipe_id)
                    .await?
                    .map_or_else(|| hold.recipe_id.to_string(), |r| r.name);
                return Err(AppError::insufficient_stock(name, hold.quantity - remaining));
            }
        }

        reservation::delete_by_client(&mut *tx, client_id).await?;

        let order = order::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::internal("Order vanished inside transaction"))?;
        let lines = order::find_lines(&mut *tx, order_id).await?;
        tx.commit().await?;

        tracing::info!(order = order_id, client = client_id, amount, "Order placed");

        ledger::broadcast_stock(&self.pool, &self.bus).await;
        ledger::broadcast_stats(&self.pool, &self.bus).await;
        self.bus
            .publish(BusMessage::OrderUpdate(OrderEventPayload {
                order_id,
                client_id: client_id.to_string(),
                status: order.status,
                amount: order.amount,
            }))
            .await;

        Ok(PlacedOrder { order, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::testutil::*;
    use crate::inventory::ReservationService;
    use shared::ErrorCode;

    async fn setup() -> (CheckoutService, ReservationService, SqlitePool, MessageBus) {
        let pool = test_pool().await;
        let bus = MessageBus::new();
        insert_client(&pool, "c1").await;
        insert_recipe(&pool, 1, "Blonde", 4.5).await;
        insert_recipe(&pool, 2, "Stout", 6.0).await;
        insert_package_size(&pool, 10, 330).await;
        // Two batches of Blonde, the older one smaller
        insert_batch(&pool, 100, 1, 1_000).await;
        insert_batch(&pool, 101, 1, 2_000).await;
        insert_stock(&pool, 100, 10, 2).await;
        insert_stock(&pool, 101, 10, 8).await;
        insert_batch(&pool, 200, 2, 1_500).await;
        insert_stock(&pool, 200, 10, 3).await;
        (
            CheckoutService::new(pool.clone(), bus.clone()),
            ReservationService::new(pool.clone(), bus.clone()),
            pool,
            bus,
        )
    }

    async fn stock_of(pool: &SqlitePool, batch_id: i64) -> i64 {
        sqlx::query_scalar("SELECT quantity FROM batch_stock WHERE batch_id = ?")
            .bind(batch_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn allocates_oldest_batch_first() {
        let (checkout, reserve, pool, _bus) = setup().await;

        reserve.create_or_increase("c1", 1, 10, 5).await.unwrap();
        let placed = checkout.checkout("c1", None).await.unwrap();

        assert_eq!(placed.order.status, OrderStatus::PendingPayment);
        assert_eq!(placed.order.amount, 22.5);
        // 2 from batch 100 (older), 3 from batch 101
        assert_eq!(placed.lines.len(), 2);
        assert_eq!(placed.lines[0].batch_id, 100);
        assert_eq!(placed.lines[0].quantity, 2);
        assert_eq!(placed.lines[1].batch_id, 101);
        assert_eq!(placed.lines[1].quantity, 3);

        assert_eq!(stock_of(&pool, 100).await, 0);
        assert_eq!(stock_of(&pool, 101).await, 5);

        // Holds are consumed
        let err = checkout.checkout("c1", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn custom_amount_rounds_up_but_never_down() {
        let (checkout, reserve, _pool, _bus) = setup().await;

        reserve.create_or_increase("c1", 1, 10, 2).await.unwrap(); // 9.00
        let placed = checkout.checkout("c1", Some(12.5)).await.unwrap();
        assert_eq!(placed.order.amount, 12.5);

        reserve.create_or_increase("c1", 1, 10, 2).await.unwrap();
        let placed = checkout.checkout("c1", Some(5.0)).await.unwrap();
        assert_eq!(placed.order.amount, 9.0, "below-total amount is clamped");
    }

    #[tokio::test]
    async fn order_total_uses_frozen_hold_prices() {
        let (checkout, reserve, pool, _bus) = setup().await;

        reserve.create_or_increase("c1", 2, 10, 2).await.unwrap();
        sqlx::query("UPDATE recipe SET base_price = 99.0 WHERE id = 2")
            .execute(&pool)
            .await
            .unwrap();

        let placed = checkout.checkout("c1", None).await.unwrap();
        assert_eq!(placed.order.amount, 12.0);
        assert_eq!(placed.lines[0].price, 6.0);
    }

    #[tokio::test]
    async fn shortfall_aborts_everything() {
        let (checkout, reserve, pool, _bus) = setup().await;

        reserve.create_or_increase("c1", 1, 10, 6).await.unwrap();
        // Physical stock shrinks behind the hold's back
        sqlx::query("UPDATE batch_stock SET quantity = 0 WHERE batch_id = 101")
            .execute(&pool)
            .await
            .unwrap();

        let err = checkout.checkout("c1", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // Rollback: untouched stock, no order, hold still there
        assert_eq!(stock_of(&pool, 100).await, 2);
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orders, 0);
        let holds: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservation")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(holds, 1);
    }

    #[tokio::test]
    async fn checkout_publishes_order_event_after_commit() {
        let (checkout, reserve, _pool, bus) = setup().await;

        reserve.create_or_increase("c1", 2, 10, 1).await.unwrap();
        let mut rx = bus.subscribe();
        let placed = checkout.checkout("c1", None).await.unwrap();

        let mut saw_order_event = false;
        while let Ok(msg) = rx.try_recv() {
            if let BusMessage::OrderUpdate(evt) = msg {
                assert_eq!(evt.order_id, placed.order.id);
                assert_eq!(evt.status, OrderStatus::PendingPayment);
                saw_order_event = true;
            }
        }
        assert!(saw_order_event);
    }

    #[tokio::test]
    async fn expired_holds_do_not_count_as_cart_content() {
        let (checkout, reserve, pool, _bus) = setup().await;

        let hold = reserve.create_or_increase("c1", 1, 10, 2).await.unwrap();
        sqlx::query("UPDATE reservation SET expires_at = 1 WHERE id = ?")
            .bind(hold.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = checkout.checkout("c1", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }
}
