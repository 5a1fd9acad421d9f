//! # Configuration
//!
//! Optional TOML configuration for the binary. Everything has a working
//! default; a `pensum.toml` next to the working directory (or a file named
//! with `--config`) overrides it. CLI flags override the file.

use pensum_core::BoardError;
use serde::Deserialize;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "pensum.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Remote snapshot storage coordinates (GitHub contents API).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub users_path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: "nerinconq".to_string(),
            repo: "generador-de-pensum".to_string(),
            users_path: "public/users".to_string(),
        }
    }
}

/// Load configuration.
///
/// An explicitly named file must exist and parse; the implicit
/// `pensum.toml` is optional and silently skipped when absent.
pub fn load(path: Option<&Path>) -> Result<AppConfig, BoardError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
    };

    if !path.exists() {
        if required {
            return Err(BoardError::Io(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| BoardError::Io(format!("read config {}: {}", path.display(), e)))?;
    toml::from_str(&raw)
        .map_err(|e| BoardError::Serialization(format!("parse config {}: {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let config = load(None).expect("load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.remote.owner, "nerinconq");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pensum.toml");
        std::fs::write(&path, "[server]\nport = 9001\n").expect("write");

        let config = load(Some(&path)).expect("load");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.remote.repo, "generador-de-pensum");
    }
}
