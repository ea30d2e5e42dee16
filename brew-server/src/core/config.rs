use std::path::PathBuf;

/// Server configuration
///
/// Every item can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/brew | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | PUSH_TCP_PORT | 8081 | TCP event push port |
/// | ASSET_BASE_URL | /assets | base URL for recipe images |
/// | HOLD_TTL_SECS | 900 | reservation lifetime |
/// | REAPER_INTERVAL_SECS | 60 | expiry sweep interval |
/// | ENVIRONMENT | development | development \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// TCP event push port (observer connections)
    pub push_tcp_port: u16,
    /// Base URL prepended to recipe image paths
    pub asset_base_url: String,
    /// Reservation lifetime in seconds
    pub hold_ttl_secs: u64,
    /// Expiry sweep interval in seconds
    pub reaper_interval_secs: u64,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/brew".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            push_tcp_port: std::env::var("PUSH_TCP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            asset_base_url: std::env::var("ASSET_BASE_URL").unwrap_or_else(|_| "/assets".into()),
            hold_ttl_secs: std::env::var("HOLD_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(900),
            reaper_interval_secs: std::env::var("REAPER_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the locations that matter in tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16, push_tcp_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.push_tcp_port = push_tcp_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Directory holding the SQLite database file
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rotated log files
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Milliseconds a fresh hold stays valid
    pub fn hold_ttl_ms(&self) -> i64 {
        self.hold_ttl_secs as i64 * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
