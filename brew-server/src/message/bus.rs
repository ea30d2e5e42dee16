//! Message bus core
//!
//! Routes events to two kinds of consumers: in-process subscribers on a
//! `tokio::sync::broadcast` channel, and external observers registered
//! through [`ObserverTransport`]. Publishing never blocks the caller on a
//! slow observer beyond the best-effort channel send.

use std::sync::Arc;

use dashmap::DashMap;
use shared::BusMessage;
use tokio::sync::broadcast;

use super::transport::ObserverTransport;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct MessageBus {
    /// In-process broadcast channel
    server_tx: broadcast::Sender<BusMessage>,
    /// Connected observers (observer id -> transport)
    clients: Arc<DashMap<String, Arc<dyn ObserverTransport>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (server_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            server_tx,
            clients: Arc::new(DashMap::new()),
        }
    }

    /// Subscribe an in-process consumer
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// Register an observer connection
    pub fn connect(&self, transport: Arc<dyn ObserverTransport>) {
        tracing::debug!(observer = transport.id(), "Observer connected");
        self.clients.insert(transport.id().to_string(), transport);
    }

    /// Remove an observer connection; silently ignores unknown ids
    pub fn disconnect(&self, id: &str) {
        if self.clients.remove(id).is_some() {
            tracing::debug!(observer = id, "Observer disconnected");
        }
    }

    pub fn observer_count(&self) -> usize {
        self.clients.len()
    }

    /// Fan one event out to every consumer, dropping observers whose
    /// transport reports them gone
    pub async fn publish(&self, msg: BusMessage) {
        // send() fails only when there are no subscribers, which is fine
        let _ = self.server_tx.send(msg.clone());

        // Snapshot the registry before awaiting; publish must not hold
        // shard locks across awaits
        let targets: Vec<(String, Arc<dyn ObserverTransport>)> = self
            .clients
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut dead = Vec::new();
        for (id, transport) in targets {
            if transport.publish(&msg).await.is_err() {
                dead.push(id);
            }
        }
        for id in dead {
            self.clients.remove(&id);
            tracing::debug!(observer = %id, "Dropped dead observer");
        }

        tracing::debug!(
            event = msg.event_name(),
            observers = self.clients.len(),
            "Event broadcast"
        );
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChannelTransport;
    use shared::message::{OrderEventPayload, StatsPayload};
    use shared::models::OrderStatus;

    fn stats_msg() -> BusMessage {
        BusMessage::StatsUpdate(StatsPayload {
            recipe_count: 3,
            total_liters_produced: 42.0,
            order_count: 1,
        })
    }

    #[tokio::test]
    async fn delivers_to_registered_observers() {
        let bus = MessageBus::new();
        let (transport, mut rx) = ChannelTransport::new("obs-1");
        bus.connect(Arc::new(transport));

        bus.publish(stats_msg()).await;

        assert_eq!(rx.recv().await.unwrap(), stats_msg());
    }

    #[tokio::test]
    async fn dead_observers_are_dropped_silently() {
        let bus = MessageBus::new();
        let (transport, rx) = ChannelTransport::new("obs-1");
        bus.connect(Arc::new(transport));
        drop(rx);

        bus.publish(stats_msg()).await;
        assert_eq!(bus.observer_count(), 0);
    }

    #[tokio::test]
    async fn in_process_subscribers_see_events() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();

        let msg = BusMessage::OrderUpdate(OrderEventPayload {
            order_id: 7,
            client_id: "c1".into(),
            status: OrderStatus::Paid,
            amount: 12.5,
        });
        bus.publish(msg.clone()).await;

        assert_eq!(rx.recv().await.unwrap(), msg);
    }
}
