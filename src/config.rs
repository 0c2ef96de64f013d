//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/grom/config.toml` (XDG) or platform config dir
//! 2. Project config: `.grom.toml`
//! 3. Environment variables: `GROM_*`
//!
//! # Intended Usage
//!
//! **Global config** (`~/.config/grom/config.toml`):
//! ```toml
//! [connection]
//! uri = "neo4j://localhost:7687"
//! username = "neo4j"
//! password = "password"
//! ```
//!
//! **Project config** (`.grom.toml`):
//! ```toml
//! [connection]
//! database = "movies"
//! ```

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
}

/// Graph store connection configuration.
///
/// Typically defined in global config (`~/.config/grom/config.toml`), with
/// the password supplied via `GROM_CONNECTION_PASSWORD` in CI environments.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Bolt URI of the server, e.g. `neo4j://localhost:7687`.
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Database to address; the server default when absent.
    #[serde(default)]
    pub database: Option<String>,
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        let user_config = Self::user_config_path();

        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(".grom.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("GROM_").split("_"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/grom/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("grom").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("grom").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_connection_section() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                [connection]
                uri = "neo4j://localhost:7687"
                username = "neo4j"
                password = "secret"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.connection.uri, "neo4j://localhost:7687");
        assert!(config.connection.database.is_none());
    }

    #[test]
    fn database_is_optional_but_honored() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                [connection]
                uri = "neo4j://localhost:7687"
                username = "neo4j"
                password = "secret"
                database = "movies"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.connection.database.as_deref(), Some("movies"));
    }
}
