use clap::{Parser, ValueEnum};
use pinhole_core::Ttl;
use pinhole_storage::{Backend, StorageSettings};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "PINHOLE_CONFIG";
pub const STORAGE_BACKEND_ENV: &str = "PINHOLE_STORAGE";
pub const URI_LENGTH_ENV: &str = "PINHOLE_URI_LENGTH";
pub const TTL_ENV: &str = "PINHOLE_TTL";
pub const HOST_ENV: &str = "PINHOLE_HOST";
pub const PORT_ENV: &str = "PINHOLE_PORT";
pub const HOSTNAME_ENV: &str = "PINHOLE_HOSTNAME";
pub const DATABASE_ENV: &str = "PINHOLE_DATABASE";
pub const SWEEP_INTERVAL_ENV: &str = "PINHOLE_SWEEP_INTERVAL";
pub const LOG_JSON_ENV: &str = "PINHOLE_LOG_JSON";

pub const DEFAULT_URI_LENGTH: usize = 8;
pub const DEFAULT_TTL_SECS: i64 = 3600;
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE: &str = "url-storage.db";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} is unreadable: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[value(name = "memory", alias = "map")]
    #[serde(alias = "map")]
    Memory,
    #[value(name = "sled", alias = "bolt")]
    #[serde(alias = "bolt")]
    Sled,
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Memory => write!(f, "memory"),
            StorageKind::Sled => write!(f, "sled"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinhole", about = "URL shortener")]
pub struct Cli {
    /// Path to a TOML config file; its values override flags.
    #[arg(long, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        alias = "url-storage",
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageKind::Memory
    )]
    pub storage: StorageKind,

    /// Length of generated identifiers.
    #[arg(long, env = URI_LENGTH_ENV, default_value_t = DEFAULT_URI_LENGTH)]
    pub uri_length: usize,

    /// Lifetime of a short link in seconds; zero or negative keeps links forever.
    #[arg(long, env = TTL_ENV, default_value_t = DEFAULT_TTL_SECS, allow_negative_numbers = true)]
    pub ttl: i64,

    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Forces the scheme and host used to build short links.
    #[arg(long, env = HOSTNAME_ENV)]
    pub hostname: Option<String>,

    /// sled database directory.
    #[arg(long, alias = "bolt-db", env = DATABASE_ENV, default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Seconds between expiry sweeps; zero disables sweeping.
    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}

/// Overrides read from the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    expiring_time: Option<i64>,
    host_name: Option<String>,
    uri_length: Option<usize>,
    url_storage: Option<StorageKind>,
    sweep_interval: Option<u64>,
    #[serde(rename = "sled-storage", alias = "bolt-storage")]
    sled_storage: Option<SledFileConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SledFileConfig {
    database: Option<PathBuf>,
}

/// Fully resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub hostname: Option<String>,
    pub ttl_secs: i64,
    pub uri_length: usize,
    pub storage: StorageKind,
    pub database: PathBuf,
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Resolves flags, then applies the config file if one was given.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from(cli);

        if let Some(path) = &cli.config {
            config.apply_file(path)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(ttl) = file.expiring_time {
            self.ttl_secs = ttl;
        }
        if let Some(hostname) = file.host_name {
            self.hostname = Some(hostname);
        }
        if let Some(uri_length) = file.uri_length {
            self.uri_length = uri_length;
        }
        if let Some(storage) = file.url_storage {
            self.storage = storage;
        }
        if let Some(interval) = file.sweep_interval {
            self.sweep_interval_secs = interval;
        }
        if let Some(database) = file.sled_storage.and_then(|sled| sled.database) {
            self.database = database;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.uri_length == 0 {
            return Err(ConfigError::Invalid(
                "uri_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Ttl {
        Ttl::from_secs(self.ttl_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn storage_settings(&self) -> StorageSettings {
        let backend = match self.storage {
            StorageKind::Memory => Backend::Volatile,
            StorageKind::Sled => Backend::Persistent {
                path: self.database.clone(),
            },
        };

        StorageSettings::builder()
            .backend(backend)
            .uri_length(self.uri_length)
            .build()
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            host: cli.host.clone(),
            port: cli.port,
            hostname: cli.hostname.clone(),
            ttl_secs: cli.ttl,
            uri_length: cli.uri_length,
            storage: cli.storage,
            database: cli.database.clone(),
            sweep_interval_secs: cli.sweep_interval,
        }
    }
}
