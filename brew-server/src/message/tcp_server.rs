//! TCP push listener
//!
//! Persistent plaintext connections receiving line-delimited JSON events.
//! Read side of the socket is ignored; this is a one-way push channel.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{ChannelTransport, MessageBus};

pub async fn run(bus: MessageBus, port: u16, shutdown: CancellationToken) {
    let addr = format!("0.0.0.0:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind push listener");
            return;
        }
    };
    tracing::info!(%addr, "Push listener started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let bus = bus.clone();
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        handle_observer(bus, stream, peer.to_string(), shutdown).await;
                    });
                }
                Err(e) => tracing::warn!(error = %e, "Failed to accept observer connection"),
            },
        }
    }

    tracing::info!("Push listener stopped");
}

async fn handle_observer(
    bus: MessageBus,
    mut stream: TcpStream,
    peer: String,
    shutdown: CancellationToken,
) {
    let id = Uuid::new_v4().to_string();
    let (transport, mut rx) = ChannelTransport::new(id.clone());
    bus.connect(Arc::new(transport));
    tracing::info!(observer = %id, %peer, "Observer connected");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                let mut line = match serde_json::to_vec(&msg) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to serialize event");
                        continue;
                    }
                };
                line.push(b'\n');
                if stream.write_all(&line).await.is_err() {
                    break;
                }
            }
        }
    }

    bus.disconnect(&id);
    tracing::info!(observer = %id, %peer, "Observer gone");
}
