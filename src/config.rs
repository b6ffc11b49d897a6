use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::UtcOffset;

use crate::scheduling::BookingPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Required when the store backend is `postgres`.
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingConfig {
    pub utc_offset: UtcOffset,
    pub min_notice_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub store_backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

const OFFSET_FORMAT: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

impl BookingConfig {
    pub fn policy(&self) -> BookingPolicy {
        BookingPolicy {
            utc_offset: self.utc_offset,
            min_notice: time::Duration::minutes(i64::from(self.min_notice_minutes)),
        }
    }
}

/// Parses `+HH:MM` / `-HH:MM`; `Z` and `UTC` mean zero.
fn parse_offset(raw: &str) -> Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(raw, OFFSET_FORMAT).with_context(|| format!("Invalid UTC offset: {raw}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server configuration
        let host = lookup("SERVER_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let request_timeout = match lookup("SERVER_REQUEST_TIMEOUT_SECS") {
            Some(val) => Duration::from_secs(val.parse().context("Failed to parse SERVER_REQUEST_TIMEOUT_SECS")?),
            None => Duration::from_secs(30),
        };

        // Database configuration
        let db_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        let db_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            None => Some(10),
        };
        let db_min_connections = match lookup("DATABASE_MIN_CONNECTIONS") {
            Some(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            None => Some(1),
        };

        // Booking rules
        let utc_offset = match lookup("BOOKING_UTC_OFFSET") {
            Some(val) => parse_offset(&val)?,
            None => UtcOffset::UTC,
        };
        let min_notice_minutes = match lookup("BOOKING_MIN_NOTICE_MINUTES") {
            Some(val) => val.parse().context("Failed to parse BOOKING_MIN_NOTICE_MINUTES")?,
            None => 0,
        };

        // App configuration
        let environment = lookup("APP_ENVIRONMENT")
            .and_then(|val| val.parse().ok())
            .unwrap_or_default();

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "Salon Backend".to_string());

        // Without a database url the service falls back to the in-memory store
        let store_backend = match lookup("STORE_BACKEND") {
            Some(val) => val.parse().map_err(anyhow::Error::msg)?,
            None if db_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if store_backend == StoreBackend::Postgres && db_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is postgres");
        }

        Ok(Config {
            server: ServerConfig {
                host,
                port,
                request_timeout,
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            booking: BookingConfig {
                utc_offset,
                min_notice_minutes,
            },
            app: AppConfig {
                name: app_name,
                environment,
                store_backend,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}
