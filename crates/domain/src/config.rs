//! Application configuration types.
//!
//! Loaded by `meetsync-infra::config` from environment variables or a
//! `config.toml`/`config.json` file. Every external collaborator is
//! optional: a missing database path, provider key, or LLM key switches the
//! corresponding subsystem into its degraded in-process / synthetic mode.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin of the web client, used for OAuth redirects.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Externally reachable origin for provider webhooks. Deployments behind
    /// a tunnel or proxy set this; absent, the local listen address is used.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), frontend_url: default_frontend_url(), webhook_url: None }
    }
}

/// Durable store settings. `path: None` runs the deployment in pure
/// in-process mode for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: None, pool_size: default_pool_size() }
    }
}

/// Calendar integration provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_provider_base_url() }
    }
}

/// LLM provider settings for summary generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { api_key: None, model: default_llm_model(), base_url: default_llm_base_url() }
    }
}

fn default_port() -> u16 {
    3001
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_pool_size() -> u32 {
    4
}

fn default_provider_base_url() -> String {
    "https://backend.composio.dev".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_collaborators_unconfigured() {
        let config = Config::default();
        assert!(config.database.path.is_none());
        assert!(config.provider.api_key.is_none());
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[database]
path = "meetsync.db"
"#,
        )
        .expect("parses");
        assert_eq!(config.database.path.as_deref(), Some("meetsync.db"));
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }
}
