//! Console configuration.
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, the
//! `KATALYST_API_URL` / `KATALYST_API_TOKEN` environment variables, and
//! finally command-line flags applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use katalyst_protocol::{DEFAULT_API_URL, DEFAULT_COMMIT_LIMIT, DEFAULT_TREND_DAYS};
use serde::{Deserialize, Serialize};

use crate::ClientError;

pub const ENV_API_URL: &str = "KATALYST_API_URL";
pub const ENV_API_TOKEN: &str = "KATALYST_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub trend_days: u32,
    pub commit_limit: u32,
    /// Raise notifications for live push / PR / issue events.
    pub notifications: bool,
    /// Ring the terminal bell on notifications.
    pub bell: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: 15,
            trend_days: DEFAULT_TREND_DAYS,
            commit_limit: DEFAULT_COMMIT_LIMIT,
            notifications: true,
            bell: false,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// `<config_dir>/katalyst/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("katalyst").join("config.toml"))
}

/// `<data_dir>/katalyst/katalyst.log`
pub fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("katalyst")
        .join("katalyst.log")
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ClientError> {
        toml::from_str(raw).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Read `path`. A missing file yields defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw)
                .map_err(|e| ClientError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ClientError::Config(format!("read {}: {e}", path.display()))),
        }
    }

    /// File (explicit or default location) followed by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let mut config = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` so callers can stub it.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("api_url '{}': {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ClientError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str("api_url = \"https://katalyst.example\"\nbell = true\n").unwrap();
        assert_eq!(config.api_url, "https://katalyst.example");
        assert!(config.bell);
        assert_eq!(config.commit_limit, 50);
        assert_eq!(config.trend_days, 30);
        assert!(config.notifications);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml_str("api_url = \"http://file:8000\"").unwrap();
        config.apply_env(|key| match key {
            ENV_API_URL => Some("http://env:9000".into()),
            ENV_API_TOKEN => Some("secret".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://env:9000");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".into()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            api_url: "ftp://nope".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
