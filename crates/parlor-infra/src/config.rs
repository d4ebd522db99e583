//! Configuration loader for Parlor.
//!
//! Reads `config.toml` from the user's config directory and deserializes
//! it into [`ClientConfig`]. Falls back to defaults when the file is
//! missing or malformed.

use std::path::{Path, PathBuf};

use parlor_types::config::ClientConfig;

/// Resolve the default config path: `<config dir>/parlor/config.toml`.
///
/// `None` when the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parlor").join("config.toml"))
}

/// Load the client configuration from `path`.
///
/// - Missing file: returns [`ClientConfig::default()`].
/// - Unreadable or malformed file: logs a warning, returns the default.
pub async fn load_client_config(path: &Path) -> ClientConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}, using defaults", path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            ClientConfig::default()
        }
    }
}

/// Resolve the backend URL: a CLI override beats the config file.
pub fn resolve_url(config: &ClientConfig, cli_override: Option<String>) -> String {
    cli_override.unwrap_or_else(|| config.url.clone())
}
