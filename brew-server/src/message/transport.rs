//! Observer transport abstraction
//!
//! Connection lifecycle is independent of the core: the engine only sees a
//! `publish(event)` capability, and anything that can carry an event to an
//! observer can register.

use async_trait::async_trait;
use shared::BusMessage;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("observer disconnected")]
    Disconnected,
}

/// A live connection to one observer
#[async_trait]
pub trait ObserverTransport: Send + Sync + std::fmt::Debug {
    /// Registry key for this observer
    fn id(&self) -> &str;

    /// Push one event; an error means the observer is gone and should be
    /// dropped from the registry.
    async fn publish(&self, msg: &BusMessage) -> Result<(), TransportError>;
}

/// Channel-backed transport
///
/// The consuming side (a TCP writer task, or a test) owns the receiver; the
/// bus owns the sender half through the registry.
#[derive(Debug)]
pub struct ChannelTransport {
    id: String,
    tx: mpsc::UnboundedSender<BusMessage>,
}

impl ChannelTransport {
    pub fn new(id: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<BusMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id: id.into(), tx }, rx)
    }
}

#[async_trait]
impl ObserverTransport for ChannelTransport {
    fn id(&self) -> &str {
        &self.id
    }

    async fn publish(&self, msg: &BusMessage) -> Result<(), TransportError> {
        self.tx
            .send(msg.clone())
            .map_err(|_| TransportError::Disconnected)
    }
}
