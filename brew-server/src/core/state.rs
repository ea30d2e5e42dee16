use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::inventory::{CheckoutService, ReservationService};
use crate::message::MessageBus;

/// Shared server state - one clone per request
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite connection pool |
/// | bus | event broadcaster |
/// | reservations | hold lifecycle service |
/// | checkout | order placement service |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub bus: MessageBus,
    pub reservations: ReservationService,
    pub checkout: CheckoutService,
}

impl ServerState {
    /// Initialize the full state: working directories, database with
    /// migrations, bus and services.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("brew.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;
        let pool = db.pool;

        let bus = MessageBus::new();
        let reservations =
            ReservationService::with_ttl(pool.clone(), bus.clone(), config.hold_ttl_ms());
        let checkout = CheckoutService::new(pool.clone(), bus.clone());

        Ok(Self {
            config: config.clone(),
            pool,
            bus,
            reservations,
            checkout,
        })
    }
}
