use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_ISSUING_BODY: &str = "Spare Parts Classroom";
pub const DEFAULT_COMPLETION_THRESHOLD: u8 = 95;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    /// Printed on every issued certificate.
    pub certificate_issuing_body: String,
    /// Viewing progress (percent) at which a training item counts as finished.
    pub completion_threshold_percent: u8,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Store configuration
        let db_url = env::var("DATABASE_URL").ok();
        let backend = match env::var("STORE_BACKEND") {
            Ok(val) => val
                .parse::<StoreBackend>()
                .map_err(anyhow::Error::msg)
                .context("Failed to parse STORE_BACKEND")?,
            Err(_) if db_url.is_some() => StoreBackend::Postgres,
            Err(_) => StoreBackend::Memory,
        };
        if backend == StoreBackend::Postgres && db_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is postgres");
        }
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1),
        };

        // App configuration
        let environment = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .parse::<Environment>()
            .unwrap_or_default();

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Training Portal".to_string());
        let certificate_issuing_body = env::var("CERTIFICATE_ISSUING_BODY")
            .unwrap_or_else(|_| DEFAULT_ISSUING_BODY.to_string());
        let completion_threshold_percent = match env::var("COMPLETION_THRESHOLD_PERCENT") {
            Ok(val) => parse_threshold(&val)?,
            Err(_) => DEFAULT_COMPLETION_THRESHOLD,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                backend,
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            app: AppConfig {
                name: app_name,
                environment,
                certificate_issuing_body,
                completion_threshold_percent,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

fn parse_threshold(value: &str) -> Result<u8> {
    let threshold = value
        .trim()
        .parse::<u8>()
        .context("Failed to parse COMPLETION_THRESHOLD_PERCENT")?;
    if !(1..=100).contains(&threshold) {
        bail!("COMPLETION_THRESHOLD_PERCENT must be between 1 and 100, got {}", threshold);
    }
    Ok(threshold)
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
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
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
