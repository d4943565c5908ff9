//! Configuration management for the bookstore server

use std::{env, path::Path, str::FromStr};

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tokio::net::TcpListener;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Which store backs the catalog
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[serde(alias = "postgresql")]
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Insert sample books into an empty store at startup
    pub seed_samples: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Plain environment variables that override the layered configuration
const ENV_OVERRIDES: [(&str, &str); 8] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSLMODE", "database.sslmode"),
    ("PORT", "server.port"),
    ("STORAGE_BACKEND", "storage.backend"),
];

impl AppConfig {
    /// Load configuration from `config/` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"), env::vars().collect())
    }

    /// Load configuration from the files in `config_dir` and the given variables
    pub fn load_from(config_dir: &Path, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());
        let file = |name: &str| {
            File::with_name(&config_dir.join(name).to_string_lossy()).required(false)
        };

        let mut builder = Config::builder()
            .add_source(file("default"))
            .add_source(file(&run_mode))
            // Nested keys use a double underscore, e.g. BOOKSTORE_DATABASE__MAX_CONNECTIONS
            .add_source(
                Environment::with_prefix("BOOKSTORE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in ENV_OVERRIDES {
            // Empty values count as unset
            let value = vars
                .get(var)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    if var == "PORT" {
                        value.trim_start_matches(':').to_string()
                    } else {
                        value.clone()
                    }
                });
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}

impl ServerConfig {
    /// Bind the listener; `host` may be an IP address or a host name
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }
}

impl DatabaseConfig {
    /// Connection options for the configured PostgreSQL server
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let ssl_mode = PgSslMode::from_str(&self.sslmode)?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode))
    }

    /// Connection target for logs, without credentials
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.name)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "bookstore".to_string(),
            sslmode: "disable".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            seed_samples: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
