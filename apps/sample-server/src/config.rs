use std::net::SocketAddr;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use sample::SampleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `SAMPLE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "SAMPLE__";

const REDACTED: &str = "***REDACTED***";

/// Process-wide configuration.
///
/// Layered as: defaults -> YAML file -> `SAMPLE__*` env -> CLI overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub sample: SampleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 3,
        }
    }
}

/// Connection settings. `dsn`, when set, wins over the discrete fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub user: String,
    pub password: String,
    /// `host:port` of the MySQL server.
    pub addr: String,
    pub name: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            user: "root".to_owned(),
            password: String::new(),
            addr: "localhost:3306".to_owned(),
            name: "sample".to_owned(),
            max_connections: 10,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Json,
        }
    }
}

/// Command-line values that override every other layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid server address {addr:?}: {source}")]
    BindAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("server.request_timeout_secs must be at least 1")]
    ZeroRequestTimeout,

    #[error("database.max_connections must be at least 1")]
    ZeroMaxConnections,

    #[error(transparent)]
    Sample(#[from] sample::ConfigError),
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and `SAMPLE__*` variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if the file cannot be parsed or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        match cli.verbose {
            0 => {}
            1 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_addr()?;
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ZeroMaxConnections);
        }
        self.sample.service_config()?;
        Ok(())
    }

    /// Copy safe to print: passwords are masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.database.password.is_empty() {
            REDACTED.clone_into(&mut copy.database.password);
        }
        copy.database.dsn = copy.database.dsn.as_deref().map(redact_dsn);
        copy
    }

    /// # Errors
    /// Fails if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_saphyr::to_string(&self.redacted())?)
    }
}

impl ServerConfig {
    /// # Errors
    /// Returns [`ConfigError::BindAddress`] if `host:port` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ConfigError::BindAddress { addr, source })
    }
}

impl DatabaseConfig {
    /// Connection URL; composes a MySQL DSN unless `dsn` is set.
    #[must_use]
    pub fn url(&self) -> String {
        if let Some(dsn) = &self.dsn {
            return dsn.clone();
        }
        format!(
            "mysql://{}:{}@{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.addr,
            self.name
        )
    }
}

fn redact_dsn(dsn: &str) -> String {
    match url::Url::parse(dsn) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some(REDACTED)).is_ok() {
                parsed.to_string()
            } else {
                REDACTED.to_owned()
            }
        }
        _ => dsn.to_owned(),
    }
}
