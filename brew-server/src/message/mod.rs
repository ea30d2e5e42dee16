//! Event broadcaster
//!
//! Fans ledger/order change notifications out to every connected observer.
//! Delivery is best-effort: no retry, no persistence, and observers that
//! connect after an event was sent never see it.
//!
//! ```text
//! Engine ──▶ publish() ──▶ broadcast channel (in-process subscribers)
//!                      └─▶ observer registry ──▶ ChannelTransport ──▶ TCP push
//! ```

mod bus;
pub mod tcp_server;
mod transport;

pub use bus::MessageBus;
pub use transport::{ChannelTransport, ObserverTransport, TransportError};
