//! Client configuration types for Parlor.
//!
//! `ClientConfig` represents the optional `config.toml` controlling the
//! backend address and presence timing. All fields have defaults matching
//! the protocol's original constants (20 minute claim TTL, 60 second
//! heartbeat).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parlor client.
///
/// Loaded from `~/.config/parlor/config.toml`. All fields have sensible
/// defaults; a missing file means a default config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend address.
    #[serde(default = "default_url")]
    pub url: String,

    /// Presence claim time-to-live, in seconds. A claim that is not
    /// refreshed within this window expires and frees the username.
    #[serde(default = "default_presence_ttl_secs")]
    pub presence_ttl_secs: u64,

    /// Heartbeat interval, in seconds. Must be well under the claim TTL.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

fn default_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_presence_ttl_secs() -> u64 {
    20 * 60
}

fn default_heartbeat_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            presence_ttl_secs: default_presence_ttl_secs(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

impl ClientConfig {
    pub fn presence_ttl(&self) -> Duration {
        Duration::from_secs(self.presence_ttl_secs)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.presence_ttl(), Duration::from_secs(1200));
        assert_eq!(config.heartbeat(), Duration::from_secs(60));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.presence_ttl_secs, 1200);
        assert_eq!(config.heartbeat_secs, 60);
    }

    #[test]
    fn test_deserialize_with_values() {
        let config: ClientConfig = toml::from_str(
            r#"
url = "redis://chat.internal:6380"
presence_ttl_secs = 300
heartbeat_secs = 15
"#,
        )
        .unwrap();
        assert_eq!(config.url, "redis://chat.internal:6380");
        assert_eq!(config.presence_ttl(), Duration::from_secs(300));
        assert_eq!(config.heartbeat(), Duration::from_secs(15));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ClientConfig {
            url: "redis://localhost:7000".to_string(),
            presence_ttl_secs: 600,
            heartbeat_secs: 30,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.url, "redis://localhost:7000");
        assert_eq!(parsed.presence_ttl_secs, 600);
        assert_eq!(parsed.heartbeat_secs, 30);
    }
}
