//! Expiry reaper
//!
//! Single background task sweeping expired holds on a fixed interval.
//! Running alone, its sweeps are inherently serialized; a failed sweep is
//! logged and the next tick tries again.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::ReservationService;

pub async fn run(service: ReservationService, interval_secs: u64, shutdown: CancellationToken) {
    let mut ticker = time::interval(Duration::from_secs(interval_secs));
    // Skip missed ticks instead of bursting after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(interval_secs, "Reservation reaper started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = service.expire_stale().await {
                    tracing::warn!(error = %e, "Reaper sweep failed");
                }
            }
        }
    }

    tracing::info!("Reservation reaper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::testutil::*;
    use crate::message::MessageBus;

    #[tokio::test]
    async fn reaper_stops_on_shutdown() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool, MessageBus::new());
        let token = CancellationToken::new();

        let handle = tokio::spawn(run(service, 60, token.clone()));
        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn reaper_sweeps_expired_holds() {
        let pool = test_pool().await;
        insert_client(&pool, "c1").await;
        insert_recipe(&pool, 1, "Blonde", 4.5).await;
        insert_package_size(&pool, 10, 330).await;
        sqlx::query(
            "INSERT INTO reservation (client_id, recipe_id, package_size_id, quantity, price, expires_at, created_at)
             VALUES ('c1', 1, 10, 1, 4.5, 1, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let service = ReservationService::new(pool.clone(), MessageBus::new());
        let token = CancellationToken::new();
        // The interval fires its first tick immediately
        let handle = tokio::spawn(run(service, 60, token.clone()));

        let mut left: i64 = 1;
        for _ in 0..50 {
            left = sqlx::query_scalar("SELECT COUNT(*) FROM reservation")
                .fetch_one(&pool)
                .await
                .unwrap();
            if left == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(left, 0);

        token.cancel();
        handle.await.unwrap();
    }
}
