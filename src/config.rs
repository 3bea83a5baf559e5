//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). `DATABASE_URL` has no default — a
//! missing storage target is a fatal startup error, never a per-request
//! condition.

use std::net::SocketAddr;

use anyhow::Context;

/// Top-level service configuration.
///
/// Loaded once at startup via [`ApiConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string. Required.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Whether to run `CREATE TABLE IF NOT EXISTS` for the battle log at
    /// startup.
    pub schema_init: bool,
}

impl ApiConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set, except
    /// for `DATABASE_URL`, which is required. Calls `dotenvy::dotenv().ok()`
    /// to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is unset or `LISTEN_ADDR` is set
    /// but cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set (directly or via a .env file)")?;

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 2);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let schema_init = parse_env_bool("DATABASE_SCHEMA_INIT", true);

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            schema_init,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
