//! Configuration loader
//!
//! Loads application configuration from a file, then applies environment
//! overrides. Every field has a default, so a missing file is not an error:
//! unconfigured collaborators put the corresponding subsystem into its
//! degraded mode instead.
//!
//! ## Environment Variables
//! - `MEETSYNC_PORT`: HTTP listen port
//! - `MEETSYNC_FRONTEND_URL`: Web client origin for OAuth redirects
//! - `MEETSYNC_WEBHOOK_URL`: Public origin provider webhooks are sent to
//! - `MEETSYNC_DB_PATH`: SQLite file path (absent: in-process mode)
//! - `MEETSYNC_DB_POOL_SIZE`: Connection pool size
//! - `MEETSYNC_COMPOSIO_API_KEY`: Calendar provider API key
//! - `MEETSYNC_COMPOSIO_BASE_URL`: Calendar provider base URL
//! - `MEETSYNC_OPENAI_API_KEY`: LLM API key (absent: synthetic summaries)
//! - `MEETSYNC_OPENAI_MODEL`: LLM model name
//! - `MEETSYNC_OPENAI_BASE_URL`: LLM API base URL
//!
//! Keys still carrying a scaffold placeholder (`your_..._here`) are treated
//! as unset.
//!
//! ## File Locations
//! The loader probes `config.{toml,json}` and `meetsync.{toml,json}` in the
//! working directory, up to two parent directories, and next to the
//! executable.

use std::path::{Path, PathBuf};

use meetsync_domain::{Config, Result, SyncError};

/// Load configuration: file (when present) plus environment overrides.
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("no config file found, starting from defaults");
            Config::default()
        }
    };
    apply_env(&mut config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Supports TOML and
/// JSON, detected by extension.
///
/// # Errors
/// Returns `SyncError::Config` if the file is missing (when a path is
/// given), unreadable, or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SyncError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SyncError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files.
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.toml", "config.json", "meetsync.toml", "meetsync.json"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            for name in names {
                candidates.push(cwd.join(format!("{prefix}{name}")));
            }
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in names {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Apply `MEETSYNC_*` environment overrides on top of the base config.
fn apply_env(config: &mut Config) -> Result<()> {
    if let Some(port) = env_opt("MEETSYNC_PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| SyncError::Config(format!("Invalid MEETSYNC_PORT: {e}")))?;
    }
    if let Some(url) = env_opt("MEETSYNC_FRONTEND_URL") {
        config.server.frontend_url = url;
    }
    if let Some(url) = env_opt("MEETSYNC_WEBHOOK_URL") {
        config.server.webhook_url = Some(url);
    }

    if let Some(path) = env_opt("MEETSYNC_DB_PATH") {
        config.database.path = Some(path);
    }
    if let Some(size) = env_opt("MEETSYNC_DB_POOL_SIZE") {
        config.database.pool_size = size
            .parse()
            .map_err(|e| SyncError::Config(format!("Invalid MEETSYNC_DB_POOL_SIZE: {e}")))?;
    }

    if let Some(key) = env_opt("MEETSYNC_COMPOSIO_API_KEY") {
        config.provider.api_key = Some(key);
    }
    if let Some(url) = env_opt("MEETSYNC_COMPOSIO_BASE_URL") {
        config.provider.base_url = url;
    }

    if let Some(key) = env_opt("MEETSYNC_OPENAI_API_KEY") {
        config.llm.api_key = Some(key);
    }
    if let Some(model) = env_opt("MEETSYNC_OPENAI_MODEL") {
        config.llm.model = model;
    }
    if let Some(url) = env_opt("MEETSYNC_OPENAI_BASE_URL") {
        config.llm.base_url = url;
    }

    // Placeholder keys count as unset.
    config.provider.api_key = config.provider.api_key.take().filter(|k| !is_placeholder(k));
    config.llm.api_key = config.llm.api_key.take().filter(|k| !is_placeholder(k));
    Ok(())
}

/// Non-empty environment variable value.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Scaffold placeholders of the form `your_..._here` are not real keys.
fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("your_") && lower.ends_with("_here")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [
            "MEETSYNC_PORT",
            "MEETSYNC_FRONTEND_URL",
            "MEETSYNC_WEBHOOK_URL",
            "MEETSYNC_DB_PATH",
            "MEETSYNC_DB_POOL_SIZE",
            "MEETSYNC_COMPOSIO_API_KEY",
            "MEETSYNC_COMPOSIO_BASE_URL",
            "MEETSYNC_OPENAI_API_KEY",
            "MEETSYNC_OPENAI_MODEL",
            "MEETSYNC_OPENAI_BASE_URL",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder("your_openai_api_key_here"));
        assert!(is_placeholder("  YOUR_COMPOSIO_API_KEY_HERE  "));
        assert!(!is_placeholder("sk-proj-abc123"));
        assert!(!is_placeholder(""));
    }

    #[test]
    fn env_overrides_win_over_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("MEETSYNC_PORT", "8080");
        std::env::set_var("MEETSYNC_OPENAI_API_KEY", "sk-test");

        let config = load().expect("config");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        clear_env();
    }

    #[test]
    fn placeholder_keys_are_dropped() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("MEETSYNC_OPENAI_API_KEY", "your_openai_api_key_here");
        std::env::set_var("MEETSYNC_COMPOSIO_API_KEY", "real-key");

        let config = load().expect("config");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.provider.api_key.as_deref(), Some("real-key"));
        clear_env();
    }

    #[test]
    fn toml_file_round_trip() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        let mut file = NamedTempFile::with_suffix(".toml").expect("temp file");
        writeln!(
            file,
            r#"
[server]
port = 4000

[database]
path = "meetsync.db"
pool_size = 8
"#
        )
        .expect("write");

        let config = load_from_file(Some(file.path().to_path_buf())).expect("config");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.path.as_deref(), Some("meetsync.db"));
        assert_eq!(config.database.pool_size, 8);
        // Untouched sections keep their defaults.
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_from_file(Some(PathBuf::from("/definitely/not/here.toml")))
            .expect_err("missing file");
        assert!(matches!(err, SyncError::Config(_)));
    }
}
