//! Brew Server - brewery storefront inventory authority
//!
//! The single logical authority for stock: every hold, checkout and expiry
//! passes through this process and its SQLite database.
//!
//! # Module structure
//!
//! ```text
//! brew-server/src/
//! ├── core/          # configuration, state, server lifecycle
//! ├── db/            # pool setup, migrations, repositories
//! ├── inventory/     # ledger, reservations, checkout, reaper
//! ├── message/       # event bus and TCP push listener
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # error bridging, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod inventory;
pub mod message;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use inventory::{CheckoutService, ReservationService};
pub use message::MessageBus;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging; call once at startup
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
    Ok(())
}
