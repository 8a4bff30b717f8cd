//! Service configuration.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-wide settings handed to the service at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// sqlx connection string for the request log.
    pub database_url: String,
    /// Pool size for file-backed databases.
    pub db_max_connections: u32,
    /// Probability in `[0, 1]` that a request fails with an injected 500.
    pub error_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: "sqlite://currency.db".to_string(),
            db_max_connections: 5,
            error_rate: 0.1,
        }
    }
}

impl Config {
    /// Read from process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = value
                .parse()
                .map_err(|e: std::net::AddrParseError| invalid("BIND_ADDR", &value, e))?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            config.database_url = value;
        }
        if let Some(value) = lookup("DB_MAX_CONNECTIONS") {
            let parsed: u32 = value
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("DB_MAX_CONNECTIONS", &value, e))?;
            if parsed == 0 {
                return Err(invalid("DB_MAX_CONNECTIONS", &value, "must be at least 1"));
            }
            config.db_max_connections = parsed;
        }
        if let Some(value) = lookup("ERROR_RATE") {
            let parsed: f64 = value
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid("ERROR_RATE", &value, e))?;
            config = config.with_error_rate(parsed)?;
        }

        Ok(config)
    }

    /// Override the failure probability. Rejects values outside `[0, 1]`.
    pub fn with_error_rate(mut self, error_rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(invalid(
                "ERROR_RATE",
                &error_rate.to_string(),
                "must be between 0 and 1",
            ));
        }
        self.error_rate = error_rate;
        Ok(self)
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
