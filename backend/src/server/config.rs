//! HTTP server configuration read from the environment.

use std::env;
use std::net::SocketAddr;

/// Default bind address when `BIND_ADDR` is unset.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Default pool size when `DB_POOL_MAX_SIZE` is unset.
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is required.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    /// `BIND_ADDR` could not be parsed as a socket address.
    #[error("invalid BIND_ADDR {value}: {message}")]
    InvalidBindAddr { value: String, message: String },

    /// `DB_POOL_MAX_SIZE` could not be parsed as a positive integer.
    #[error("invalid DB_POOL_MAX_SIZE {value}")]
    InvalidPoolSize { value: String },
}

/// Server configuration assembled once at startup and passed explicitly; no
/// part of the application reads the environment after this point.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: String,
    pool_max_size: u32,
}

impl ServerConfig {
    /// Read configuration from `DATABASE_URL`, `BIND_ADDR`, and
    /// `DB_POOL_MAX_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let bind_value = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_value
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: bind_value,
                message: err.to_string(),
            })?;

        let pool_max_size = match env::var("DB_POOL_MAX_SIZE") {
            Ok(value) => value
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize { value })?,
            Err(_) => DEFAULT_POOL_MAX_SIZE,
        };

        Ok(Self {
            bind_addr,
            database_url,
            pool_max_size,
        })
    }

    /// Construct a configuration directly, for tests and embedding.
    pub fn new(bind_addr: SocketAddr, database_url: impl Into<String>, pool_max_size: u32) -> Self {
        Self {
            bind_addr,
            database_url: database_url.into(),
            pool_max_size,
        }
    }

    /// Return the socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the PostgreSQL connection URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Return the maximum connection pool size.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn new_keeps_explicit_values() {
        let config = ServerConfig::new(
            "127.0.0.1:9000".parse().expect("valid addr"),
            "postgres://localhost/exchange",
            4,
        );
        assert_eq!(config.bind_addr().port(), 9000);
        assert_eq!(config.database_url(), "postgres://localhost/exchange");
        assert_eq!(config.pool_max_size(), 4);
    }
}
