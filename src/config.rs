//! Configuration manager for tessera.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ACCESS_EXPIRE: u64 = 5; // 5 minutes.
const DEFAULT_REFRESH_EXPIRE: u64 = 60 * 24 * 14; // 14 days.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to token lifetimes.
    #[serde(default, skip_serializing)]
    pub token: Token,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: default_name(),
            port: DEFAULT_PORT,
            version: VERSION.to_owned(),
            path: PathBuf::default(),
            token: Token::default(),
        }
    }
}

/// Token lifetimes, in minutes.
///
/// The signing key is read from the `KEY` environment variable.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Token {
    #[serde(default = "default_access_expire")]
    pub access_expire: u64,
    #[serde(default = "default_refresh_expire")]
    pub refresh_expire: u64,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            access_expire: DEFAULT_ACCESS_EXPIRE,
            refresh_expire: DEFAULT_REFRESH_EXPIRE,
        }
    }
}

fn default_name() -> String {
    env!("CARGO_CRATE_NAME").to_owned()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_access_expire() -> u64 {
    DEFAULT_ACCESS_EXPIRE
}

fn default_refresh_expire() -> u64 {
    DEFAULT_REFRESH_EXPIRE
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Application version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(&file_path) {
            Ok(file) => match serde_yaml::from_reader::<_, Configuration>(file) {
                Ok(mut config) => {
                    // set app version.
                    config.version = VERSION.to_owned();
                    config.path = file_path;
                    Arc::new(config)
                },
                Err(err) => Arc::new(self.error(err)),
            },
            Err(err) => Arc::new(self.error(err)),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file could not be read");
        Self {
            path: self.path.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Configuration = serde_yaml::from_str("name: test").unwrap();

        assert_eq!(config.name, "test");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.token, Token::default());
    }

    #[test]
    fn test_token_section() {
        let config: Configuration =
            serde_yaml::from_str("token:\n  access_expire: 15\n").unwrap();

        assert_eq!(config.token.access_expire, 15);
        assert_eq!(config.token.refresh_expire, DEFAULT_REFRESH_EXPIRE);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Configuration::default()
            .path(PathBuf::from("does/not/exist.yaml"))
            .read();

        assert_eq!(config.version(), VERSION);
        assert_eq!(config.token, Token::default());
    }
}
