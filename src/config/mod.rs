use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::profile::MAX_PROFILE_CHARS;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

/// WebSocket gateway the bot platform (or a test client) connects to.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_any_origin: bool,
    pub max_age: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub profile_max_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub chat: ChatConfig,
}

fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("environment", environment)?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.workers", num_cpus::get() as i64)?
        .set_default("gateway.host", "127.0.0.1")?
        .set_default("gateway.port", 8081)?
        .set_default("gateway.heartbeat_interval_secs", 30)?
        .set_default("gateway.heartbeat_timeout_secs", 40)?
        .set_default("auth.jwt_secret", "development_secret")?
        .set_default("auth.token_expiry_hours", 24)?
        .set_default("cors.enabled", true)?
        .set_default("cors.allow_any_origin", false)?
        .set_default("cors.max_age", 3600)?
        .set_default("chat.profile_max_chars", MAX_PROFILE_CHARS as i64)
}

fn env_source() -> Environment {
    // E.g., `APP_GATEWAY__PORT=9001` would set `Settings.gateway.port`
    Environment::with_prefix("app")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        with_defaults("development")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only; no files, no environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults("test")?.build()?.try_deserialize()
    }

    #[cfg(test)]
    pub fn new_for_test() -> Result<Self, ConfigError> {
        with_defaults("test")?
            .set_override("auth.jwt_secret", "test_secret")?
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}
