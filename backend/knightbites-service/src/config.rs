/// Configuration management for the Knight Bites service
///
/// Values come from environment variables (a `.env` file is loaded first by
/// the binary). Database settings live in the `db-pool` crate.
use db_pool::parse_env_with_default;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service name used for pool metrics labels and logs
pub const SERVICE_NAME: &str = "knightbites-service";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub log: LogConfig,
    /// Column set of the Post table
    pub post_schema: PostSchema,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or `*`
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log store failure detail at debug level
    pub diagnostics: bool,
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

/// Which Post columns the connected schema carries.
///
/// Either way `posttime` (and `meetuptime` when present) must be
/// `TIMESTAMPTZ`; rows decode them as `DateTime<Utc>` and a plain
/// `TIMESTAMP` column fails every post read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSchema {
    /// title, body, post time and author only
    Basic,
    /// adds meetup time and restaurant reference
    #[default]
    Meetup,
}

impl PostSchema {
    pub fn has_meetup_columns(self) -> bool {
        matches!(self, PostSchema::Meetup)
    }
}

impl FromStr for PostSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(PostSchema::Basic),
            "meetup" => Ok(PostSchema::Meetup),
            other => Err(format!(
                "POST_SCHEMA must be 'basic' or 'meetup', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for PostSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostSchema::Basic => f.write_str("basic"),
            PostSchema::Meetup => f.write_str("meetup"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "*".to_string(),
        };
        if production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let post_schema = match std::env::var("POST_SCHEMA") {
            Ok(value) => value.parse()?,
            Err(_) => PostSchema::default(),
        };

        Ok(Config {
            app: AppConfig {
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("PORT", 3000),
                env: app_env.clone(),
            },
            cors: CorsConfig { allowed_origins },
            log: LogConfig {
                diagnostics: parse_env_with_default(
                    "APP_DIAGNOSTICS",
                    app_env.eq_ignore_ascii_case("development"),
                ),
                json: std::env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            post_schema,
        })
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.log.diagnostics {
            "debug,actix_server=info,sqlx=info"
        } else {
            "info"
        }
    }
}
