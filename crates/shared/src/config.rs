//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Minimum confidence for an auto-created catalog mapping, in [0,1].
    /// Matches below this are left unmapped for manual resolution.
    /// Configured as a string (e.g. "0.4") to keep decimal precision.
    #[serde(default = "default_auto_map_threshold")]
    pub auto_map_threshold: rust_decimal::Decimal,
}

fn default_auto_map_threshold() -> rust_decimal::Decimal {
    rust_decimal::Decimal::new(4, 1)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_map_threshold: default_auto_map_threshold(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CONTARA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
        };
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.engine.auto_map_threshold,
            rust_decimal::Decimal::new(4, 1)
        );
    }
}
