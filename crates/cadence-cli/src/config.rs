use cadence_core::recurrence::{
    MaterializationConfig, DEFAULT_HORIZON_DAYS, DEFAULT_MAX_OCCURRENCES,
};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Layered configuration: built-in defaults, then `cadence.toml`, then
/// `CADENCE_`-prefixed environment variables (`__` separates nested keys,
/// e.g. `CADENCE_SERVER__PORT=8080`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`
    pub log_filter: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub materialization: MaterializationSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for occurrence materialization
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MaterializationSettings {
    /// Days after the start an open-ended pattern runs for
    pub horizon_days: u32,
    /// Upper bound on occurrences generated for one action
    pub max_occurrences: usize,
    /// Move notes onto the regenerated occurrence of the same date
    pub preserve_notes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "cadence.db".to_string(),
            log_filter: "cadence=warn,tower_http=info".to_string(),
            server: ServerConfig::default(),
            materialization: MaterializationSettings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for MaterializationSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            preserve_notes: true,
        }
    }
}

impl From<&MaterializationSettings> for MaterializationConfig {
    fn from(settings: &MaterializationSettings) -> Self {
        MaterializationConfig {
            horizon_days: settings.horizon_days,
            max_occurrences: settings.max_occurrences,
            preserve_notes: settings.preserve_notes,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("cadence.toml"))
            .merge(Env::prefixed("CADENCE_").split("__"))
    }
}
