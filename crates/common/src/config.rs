//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;
use std::time::Duration;

use crate::allow_list::AllowList;

pub const DEFAULT_CITIES: &str = "Moscow,Saint Petersburg,Kazan";
pub const DEFAULT_PRODUCT_TYPES: &str = "electronics,clothes,shoes";
pub const DEFAULT_ROLES: &str = "client,employee,moderator";

#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// How often pool statistics are sampled into metrics
    pub db_metrics_interval: Duration,

    /// HS256 signing secret for issued tokens
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub allowed_cities: AllowList,
    pub allowed_product_types: AllowList,
    pub allowed_roles: AllowList,

    /// Runtime configuration
    pub log_format: LogFormat,
    pub port: u16,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Log output format selected with `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} is required", key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 10)?,
            db_acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                5,
            )?),
            db_metrics_interval: Duration::from_secs(parse_or(
                "DB_METRICS_INTERVAL_SECS",
                lookup("DB_METRICS_INTERVAL_SECS"),
                15,
            )?),

            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_secs: parse_or("JWT_TTL_SECS", lookup("JWT_TTL_SECS"), 86_400)?,

            allowed_cities: AllowList::parse(&or_default("ALLOWED_CITIES", DEFAULT_CITIES)),
            allowed_product_types: AllowList::parse(&or_default(
                "ALLOWED_PRODUCT_TYPES",
                DEFAULT_PRODUCT_TYPES,
            )),
            allowed_roles: AllowList::parse(&or_default("ALLOWED_ROLES", DEFAULT_ROLES)),

            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            port: parse_or("PORT", lookup("PORT"), 8080)?,
            run_migrations: parse_or("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?,
        };

        if config.allowed_cities.is_empty() {
            anyhow::bail!("ALLOWED_CITIES must not be empty");
        }
        if config.allowed_product_types.is_empty() {
            anyhow::bail!("ALLOWED_PRODUCT_TYPES must not be empty");
        }
        if config.db_metrics_interval.is_zero() {
            anyhow::bail!("DB_METRICS_INTERVAL_SECS must be positive");
        }

        Ok(config)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, value)),
    }
}
