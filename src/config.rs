use crate::backend::normalize_base_url;
use crate::log_debug;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `backend_url`
pub const BACKEND_URL_ENV: &str = "LINGUREPO_BACKEND_URL";
/// Environment variable overriding `http.request_timeout_secs`
pub const REQUEST_TIMEOUT_ENV: &str = "LINGUREPO_REQUEST_TIMEOUT";

/// Configuration structure for the `LinguRepo` client
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the repository-analysis service
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Caller-level retry policy, off by default
    #[serde(default)]
    pub retry: RetryConfig,
    /// Where `analyze` writes the finished document
    #[serde(default = "default_export_path")]
    pub export_path: String,
    /// Whether to enable verbose logging (includes HTTP client internals)
    #[serde(default)]
    pub verbose_logging: bool,
}

/// HTTP client timeouts
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Analysis of a large selection can take minutes
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Retry configuration
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default)]
    pub attempts: usize,
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 0,
            base_delay_ms: default_base_delay(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_export_path() -> String {
    crate::export::DEFAULT_EXPORT_FILE.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    300
}

fn default_base_delay() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            export_path: default_export_path(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Load the configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Save the configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        log_debug!("Configuration saved to {}: {:?}", path.display(), self);
        Ok(())
    }

    /// Get the path to the configuration file
    fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("lingurepo");
        fs::create_dir_all(&path)?;
        path.push("config.toml");
        Ok(path)
    }

    /// Apply `LINGUREPO_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(BACKEND_URL_ENV).ok(),
            std::env::var(REQUEST_TIMEOUT_ENV).ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        backend_url: Option<String>,
        request_timeout: Option<String>,
    ) -> Result<()> {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            log_debug!("Backend URL overridden by {}: {}", BACKEND_URL_ENV, url);
            self.backend_url = url.trim().to_string();
        }
        if let Some(timeout) = request_timeout {
            self.http.request_timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{REQUEST_TIMEOUT_ENV} must be a number of seconds"))?;
        }
        Ok(())
    }

    /// Check that the configuration can be used to talk to a backend
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.backend_url)?;
        if self.http.request_timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least one second"));
        }
        if self.export_path.trim().is_empty() {
            return Err(anyhow!("Export path must not be empty"));
        }
        Ok(())
    }

    /// Update the configuration with new values
    pub fn update(
        &mut self,
        backend_url: Option<String>,
        request_timeout_secs: Option<u64>,
        retry_attempts: Option<usize>,
        export_path: Option<String>,
    ) -> Result<()> {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(timeout) = request_timeout_secs {
            self.http.request_timeout_secs = timeout;
        }
        if let Some(attempts) = retry_attempts {
            self.retry.attempts = attempts;
        }
        if let Some(path) = export_path {
            self.export_path = path;
        }

        self.validate()?;
        log_debug!("Configuration updated: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.http.request_timeout_secs, 300);
        assert_eq!(config.retry.attempts, 0);
        assert_eq!(config.export_path, "lingurepo-design-document.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            backend_url = "https://analysis.example.com"

            [retry]
            attempts = 2
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.backend_url, "https://analysis.example.com");
        assert_eq!(config.retry.attempts, 2);
        assert_eq!(config.retry.base_delay_ms, 200);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = Config::default();
        config
            .apply_overrides(
                Some(" http://10.0.0.5:9000 ".to_string()),
                Some("60".to_string()),
            )
            .expect("valid overrides");

        assert_eq!(config.backend_url, "http://10.0.0.5:9000");
        assert_eq!(config.http.request_timeout_secs, 60);
    }

    #[test]
    fn bad_timeout_override_is_an_error() {
        let mut config = Config::default();
        assert!(
            config
                .apply_overrides(None, Some("soon".to_string()))
                .is_err()
        );
    }

    #[test]
    fn validate_rejects_unsupported_urls() {
        let mut config = Config::default();
        config.backend_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.backend_url = "localhost:8000/api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_exactly_what_the_backend_accepts() {
        let candidates = [
            "http://localhost:8000",
            "  https://analysis.example.com/api  ",
            "ftp://example.com",
            "localhost:8000",
            "",
        ];
        for candidate in candidates {
            let mut config = Config::default();
            config.backend_url = candidate.to_string();
            assert_eq!(
                config.validate().is_ok(),
                normalize_base_url(candidate).is_ok(),
                "disagreement on {candidate:?}"
            );
        }
    }

    #[test]
    fn update_validates_result() {
        let mut config = Config::default();
        config
            .update(None, Some(30), Some(3), Some("out.json".to_string()))
            .expect("valid update");
        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.export_path, "out.json");

        assert!(config.update(None, Some(0), None, None).is_err());
    }
}
