use bigdecimal::BigDecimal;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub stock: StockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply `migrations/` on startup
    pub run_migrations: bool,
}

/// Which store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    pub backend: StoreBackend,
    /// Liters per unit given to newly imported units, also used as the
    /// volume label in the detailed summary
    pub unit_volume: String,
    /// Warehouse label written to every unit when a refresh run resets
    /// stock; unset clears the warehouse
    #[serde(default)]
    pub reset_warehouse: Option<String>,
}

impl StockConfig {
    pub fn unit_volume(&self) -> Result<BigDecimal, ConfigError> {
        BigDecimal::from_str(&self.unit_volume).map_err(|e| {
            ConfigError::Message(format!("stock.unit_volume '{}': {}", self.unit_volume, e))
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/gts_stock".to_string(),
                max_connections: 20,
                run_migrations: true,
            },
            stock: StockConfig {
                backend: StoreBackend::Postgres,
                unit_volume: "0.25".to_string(),
                reset_warehouse: None,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then `config/default.toml` if present,
    /// then `GTS__SECTION__KEY` env vars. The plain `DATABASE_URL`,
    /// `SERVER_HOST` and `SERVER_PORT` vars win over everything else.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default("database.run_migrations", defaults.database.run_migrations)?
            .set_default("stock.backend", "postgres")?
            .set_default("stock.unit_volume", defaults.stock.unit_volume)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("GTS").separator("__"))
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.stock.unit_volume()?;
        Ok(app)
    }
}
