//! Server Implementation
//!
//! Router assembly, background task startup and graceful shutdown.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::inventory::reaper;
use crate::message::tcp_server;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server around already-initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let mut tasks = BackgroundTasks::new();
        tasks.spawn(
            "reservation_reaper",
            TaskKind::Periodic,
            reaper::run(
                state.reservations.clone(),
                self.config.reaper_interval_secs,
                tasks.shutdown_token(),
            ),
        );
        tasks.spawn(
            "push_listener",
            TaskKind::Listener,
            tcp_server::run(
                state.bus.clone(),
                self.config.push_tcp_port,
                tasks.shutdown_token(),
            ),
        );

        let app = build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Brew server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}

/// All routes, no middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::beers::router())
        .merge(api::cart::router())
        .merge(api::orders::router())
}

/// Fully configured application with middleware and state attached
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
