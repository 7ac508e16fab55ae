//! Runtime configuration, read once at startup from `KPI_*` environment
//! variables (a local `.env` file is honored when present).
//!
//! | Variable        | Default     | Meaning                          |
//! |-----------------|-------------|----------------------------------|
//! | `KPI_ENV`       | development | deployment stage                 |
//! | `KPI_HOST`      | 127.0.0.1   | bind address (or `localhost`)    |
//! | `KPI_PORT`      | 4000        | bind port                        |
//! | `KPI_LOG_LEVEL` | info        | default tracing filter directive |

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unrecognized stage names fall back to development rather than failing
    /// startup.
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&var_or("KPI_ENV", "development")),
            server: ServerConfig {
                host: var_or("KPI_HOST", "127.0.0.1"),
                port: parse_port(&var_or("KPI_PORT", "4000"))?,
            },
            telemetry: TelemetryConfig {
                log_level: var_or("KPI_LOG_LEVEL", "info"),
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Port {
        value: raw.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolves the bind address. `localhost` is accepted as a convenience
    /// alias for the IPv4 loopback; anything else must be a literal IP.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::Host { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Knobs consumed by [`crate::telemetry::init`].
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Port { value: String },
    Host { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Port { value } => {
                write!(f, "KPI_PORT '{value}' is not a valid port number")
            }
            ConfigError::Host { .. } => {
                write!(f, "KPI_HOST must be an IP address or 'localhost'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Port { .. } => None,
            ConfigError::Host { source } => Some(source),
        }
    }
}
