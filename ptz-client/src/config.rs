//! Console client configuration.
//!
//! Loaded from `ptz-client.toml` next to the binary; every field has a
//! default, and a missing or malformed file degrades to defaults with
//! a logged note. The binary takes no command-line flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the console client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Console appearance.
    pub ui: UiConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Rig service host, a name resolved by the surrounding network.
    pub host: String,
    /// Rig service port.
    pub port: u16,
    /// Seconds between unsuccessful connection attempts.
    pub retry_secs: u64,
}

/// Console appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme name looked up in the theme file.
    pub theme: String,
    /// Theme definition file.
    pub theme_file: String,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
    /// Directory receiving one log file per calendar day.
    pub dir: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: ptz_core::DEFAULT_HOST.to_string(),
            port: ptz_core::DEFAULT_PORT,
            retry_secs: ptz_core::RETRY_TIMER.as_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            theme_file: "themes.toml".into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            dir: "logs".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ClientConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = ClientConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("host"));
        assert!(text.contains("retry_secs"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = ClientConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.host, "fc0");
        assert_eq!(parsed.network.port, 50201);
        assert_eq!(parsed.network.retry_secs, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: ClientConfig = toml::from_str("[network]\nport = 4321\n").unwrap();
        assert_eq!(parsed.network.port, 4321);
        assert_eq!(parsed.network.host, "fc0");
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = ClientConfig::load(Path::new("/nonexistent/ptz-client.toml"));
        assert_eq!(cfg.network.port, 50201);
    }
}
