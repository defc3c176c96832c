//! Database connection pool management
//!
//! Builds the single PostgreSQL pool shared by every request handler. The
//! connection target comes either from `DATABASE_URL` or from the discrete
//! `DB_SERVER` / `DB_PORT` / `DB_NAME` / `DB_USER` / `DB_PASSWORD` variables
//! used by hosted deployments.

mod env_utils;
mod metrics;

pub use env_utils::{parse_env_optional, parse_env_required, parse_env_with_default};
pub use metrics::acquire_with_metrics;

use metrics::update_pool_metrics;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// Where the pool connects to
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// Full PostgreSQL connection URL
    Url(String),
    /// Discrete connection parameters
    Parts {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: Option<String>,
    },
}

impl ConnectionTarget {
    /// Resolve the target from the environment.
    ///
    /// `DATABASE_URL` wins when set. Otherwise `DB_SERVER` and `DB_USER` are
    /// required; the database name falls back to the user name.
    pub fn from_env() -> Result<Self, String> {
        if let Some(url) = parse_env_optional::<String>("DATABASE_URL") {
            if !url.trim().is_empty() {
                return Ok(Self::Url(url));
            }
        }

        let host = parse_env_required::<String>("DB_SERVER")
            .map_err(|_| "DATABASE_URL or DB_SERVER must be set".to_string())?;
        let user = parse_env_required::<String>("DB_USER")?;
        let database = parse_env_optional::<String>("DB_NAME").unwrap_or_else(|| user.clone());

        Ok(Self::Parts {
            host,
            port: parse_env_with_default("DB_PORT", 5432),
            database,
            user,
            password: parse_env_optional("DB_PASSWORD"),
        })
    }

    fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            Self::Url(url) => url.parse(),
            Self::Parts {
                host,
                port,
                database,
                user,
                password,
            } => {
                let options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .database(database)
                    .username(user);
                Ok(match password {
                    Some(password) => options.password(password),
                    None => options,
                })
            }
        }
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            Self::Parts {
                host,
                port,
                database,
                user,
                password,
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .field("user", user)
                .field("password", &password.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

/// Database connection pool configuration
#[derive(Clone, Debug)]
pub struct DbConfig {
    /// Service name for metrics labeling
    pub service_name: String,
    /// Connection target
    pub target: ConnectionTarget,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Timeout for the startup `SELECT 1` verification
    pub connect_timeout_secs: u64,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection idle timeout
    pub idle_timeout_secs: u64,
    /// Connection maximum lifetime
    pub max_lifetime_secs: u64,
}

impl DbConfig {
    /// Pool defaults for the given target
    pub fn new(service_name: &str, target: ConnectionTarget) -> Self {
        Self {
            service_name: service_name.to_string(),
            target,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }

    /// Create a new DbConfig from environment variables
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let defaults = Self::new(service_name, ConnectionTarget::from_env()?);

        let max_connections = parse_env_with_default("DB_MAX_CONNECTIONS", defaults.max_connections);
        let min_connections = parse_env_with_default("DB_MIN_CONNECTIONS", defaults.min_connections)
            .min(max_connections);

        Ok(Self {
            max_connections,
            min_connections,
            connect_timeout_secs: parse_env_with_default(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default(
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            ),
            max_lifetime_secs: parse_env_with_default(
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime_secs,
            ),
            ..defaults
        })
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            target = ?self.target,
            "Database Pool Configuration: \
             max_connections={}, min_connections={}, \
             connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.max_connections,
            self.min_connections,
            self.connect_timeout_secs,
            self.acquire_timeout_secs,
            self.idle_timeout_secs,
            self.max_lifetime_secs
        );
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .test_before_acquire(true)
    }
}

/// Create a PostgreSQL connection pool and verify it with `SELECT 1`.
///
/// Starts a background task refreshing the pool gauges every 30 seconds.
pub async fn create_pool(config: DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        "Creating database pool: service={}, max={}, min={}, acquire_timeout={}s",
        config.service_name,
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
    );

    let pool = config
        .pool_options()
        .connect_with(config.target.connect_options()?)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );

            update_pool_metrics(&pool, &config.service_name);

            let pool_clone = pool.clone();
            let service = config.service_name.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(30));
                loop {
                    interval.tick().await;
                    update_pool_metrics(&pool_clone, &service);
                }
            });

            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Create a pool that opens connections on first use.
///
/// Nothing is verified up front, so this never fails on an unreachable
/// server; the first query reports the failure instead.
pub fn create_lazy_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    Ok(config
        .pool_options()
        .min_connections(0)
        .connect_lazy_with(config.target.connect_options()?))
}
