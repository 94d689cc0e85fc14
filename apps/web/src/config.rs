//! # Application Configuration
//!
//! Layered settings for the web server.
//!
//! ## Sources (later wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults            AppConfig::default()                  │
//! │  2. TOML file (optional)         ./kasir.toml, or $KASIR_CONFIG        │
//! │  3. Environment                  KASIR_HTTP_PORT, KASIR_DATABASE_PATH… │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use config::{Config, Environment, File, FileFormat};
use kasir_core::Money;
use kasir_db::DbConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Default config file, read if present.
pub const DEFAULT_CONFIG_FILE: &str = "kasir.toml";

/// Environment variable that points at a different config file.
pub const CONFIG_PATH_ENV: &str = "KASIR_CONFIG";

/// Prefix for per-field environment overrides.
pub const ENV_PREFIX: &str = "KASIR";

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address to bind.
    pub http_host: String,

    /// Port to bind.
    pub http_port: u16,

    /// SQLite database file (`:memory:` for a throwaway database).
    pub database_path: PathBuf,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// How long a sale waits for another sale's transaction, in seconds.
    pub busy_timeout_secs: u64,

    /// Shown in the page header.
    pub store_name: String,

    /// Currency symbol for display (e.g. "Rp", "$").
    pub currency_symbol: String,

    /// Number of decimal places for currency display.
    pub currency_decimals: u8,

    /// Rows shown on the sales listing.
    pub recent_sales_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            database_path: PathBuf::from("kasir.db"),
            max_connections: 5,
            busy_timeout_secs: 5,
            store_name: "Kasir POS".to_string(),
            currency_symbol: "Rp".to_string(),
            currency_decimals: 0,
            recent_sales_limit: 50,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default file location and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Loads configuration from `path` (if it exists) and the environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<AppConfig>()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.recent_sales_limit == 0 {
            return Err(ConfigError::InvalidValue("recent_sales_limit".to_string()));
        }
        if self.currency_decimals > 4 {
            return Err(ConfigError::InvalidValue("currency_decimals".to_string()));
        }
        Ok(())
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .http_host
            .parse()
            .map_err(|_| ConfigError::InvalidValue("http_host".to_string()))?;
        Ok(SocketAddr::new(ip, self.http_port))
    }

    /// Database settings for [`kasir_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::Money;
    /// use kasir_web::config::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(17_500)), "Rp17.500");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(u32::from(self.currency_decimals));
        let whole = (cents / divisor).unsigned_abs();
        let frac = (cents % divisor).unsigned_abs();

        // Rupiah-style grouping: "." between thousands, "," before decimals.
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!(
            "{}{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            grouped,
            if self.currency_decimals > 0 {
                format!(",{:0width$}", frac, width = self.currency_decimals as usize)
            } else {
                String::new()
            }
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
