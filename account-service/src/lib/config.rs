use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Which credential carrier guards the API and how session tokens are kept.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Request authentication strategy.
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Session token storage.
    #[serde(default)]
    pub session_store: SessionStoreKind,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Paths that never require authentication. Entries ending in '*' match
    /// by prefix; exact entries ignore a trailing slash.
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            session_store: SessionStoreKind::default(),
            cookie_name: default_cookie_name(),
            excluded_paths: default_excluded_paths(),
        }
    }
}

/// How an inbound request proves who it is.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Opaque session token read from the cookie jar.
    #[default]
    Session,
    /// HTTP Basic credentials on every request.
    Basic,
}

/// Where issued session tokens live.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// On the user record: a single current session per user, a new login
    /// overwrites the previous token.
    #[default]
    Persisted,
    /// In a process-wide map: multiple concurrent sessions per user, lost on
    /// restart.
    Memory,
}

fn default_cookie_name() -> String {
    "session_id".to_string()
}

fn default_excluded_paths() -> Vec<String> {
    ["/status", "/users", "/sessions", "/reset_password"]
        .map(String::from)
        .to_vec()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__COOKIE_NAME, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__COOKIE_NAME=sid overrides auth.cookie_name
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
