//! Configuration loading for the MusicVista service
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument / environment variable (merged by the binary's CLI parser)
//! 2. TOML config file
//! 3. OS-dependent compiled default (fallback)
//!
//! A missing config file at the default location is not an error; the
//! service starts on compiled defaults. An explicitly requested file that
//! cannot be read or parsed is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3001;

/// Comma-separated allowed CORS origins
pub const CORS_ORIGINS_ENV: &str = "MVISTA_CORS_ORIGINS";
/// Single front-end origin, read when `MVISTA_CORS_ORIGINS` is unset
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";

/// Compiled defaults used when neither CLI, environment nor TOML supply a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_path: default_data_dir().join("mvista.db"),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// OS-dependent data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mvista"))
        .unwrap_or_else(|| PathBuf::from("./mvista_data"))
}

/// Default location of the TOML config file (`<config dir>/mvista/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mvista").join("config.toml"))
}

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Bootstrap configuration as written in the TOML file; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    /// Open the catalog read-only and skip schema creation
    pub read_only: Option<bool>,
    pub cors_origins: Option<Vec<String>>,
    pub environment: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub read_only: bool,
    pub environment: Option<String>,
    pub cors_origins: Option<Vec<String>>,
    pub log_level: Option<String>,
}

/// Split a comma-separated origin list; `None` when nothing is left
pub fn parse_origin_list(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

/// CORS origins from `MVISTA_CORS_ORIGINS`, else from `FRONTEND_URL`
pub fn cors_origins_from_env() -> Option<Vec<String>> {
    [CORS_ORIGINS_ENV, FRONTEND_URL_ENV]
        .into_iter()
        .find_map(|name| std::env::var(name).ok().and_then(|raw| parse_origin_list(&raw)))
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub read_only: bool,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_level: String,
    /// TOML file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve configuration from overrides, the TOML file and compiled defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let config_file = overrides
            .config_file
            .clone()
            .or_else(|| default_config_path().filter(|p| p.exists()));
        let toml = match &config_file {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::default(),
        };
        let mut config = Self::merge(overrides, toml, CompiledDefaults::for_current_platform());
        config.config_file = config_file;
        Ok(config)
    }

    /// Merge the three tiers, highest priority first
    pub fn merge(overrides: &ConfigOverrides, toml: TomlConfig, defaults: CompiledDefaults) -> Self {
        Self {
            host: overrides
                .host
                .clone()
                .or(toml.host)
                .unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            database_path: overrides
                .database_path
                .clone()
                .or(toml.database_path)
                .unwrap_or(defaults.database_path),
            read_only: overrides.read_only || toml.read_only.unwrap_or(false),
            cors_origins: overrides
                .cors_origins
                .clone()
                .or(toml.cors_origins)
                .unwrap_or(defaults.cors_origins),
            environment: overrides
                .environment
                .clone()
                .or(toml.environment)
                .unwrap_or(defaults.environment),
            log_level: overrides
                .log_level
                .clone()
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
            config_file: None,
        }
    }

    /// `host:port` string for binding the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
