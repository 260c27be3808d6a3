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
    pub auth: AuthConfig,
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared signing secret; must be stable across restarts or every
    /// outstanding session and one-time token is invalidated.
    pub secret: String,

    #[serde(default = "default_session_lifetime")]
    pub session_lifetime_seconds: i64,

    #[serde(default = "default_token_lifetime")]
    pub reset_token_lifetime_seconds: i64,

    #[serde(default = "default_token_lifetime")]
    pub verification_token_lifetime_seconds: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_true")]
    pub cookie_secure: bool,

    /// When false, `POST /api/auth/register` is refused; accounts can then
    /// only be created by privileged tooling (first-superuser bootstrap).
    #[serde(default = "default_true")]
    pub open_registration: bool,

    /// When true, the self-service routes require a verified account
    /// instead of merely an active one.
    #[serde(default)]
    pub require_verification: bool,

    #[serde(default)]
    pub first_superuser: Option<FirstSuperuser>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirstSuperuser {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

/// Settings for the optional OAuth passthrough (compiled in behind the
/// `oauth` cargo feature; wired only when this section is present).
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_url: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_session_lifetime() -> i64 {
    3600
}

fn default_token_lifetime() -> i64 {
    3600
}

fn default_cookie_name() -> String {
    "identity_session".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// Resolved exactly once at process start and passed down by value;
    /// nothing else reads the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
