//! Client configuration
//!
//! Read from `$XDG_CONFIG_HOME/agenthub/config.toml`, then overridden by
//! `AGENTHUB_MODE` and `AGENTHUB_ORIGIN`. Logs live under
//! `$XDG_STATE_HOME/agenthub/`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.mode`
pub const MODE_ENV: &str = "AGENTHUB_MODE";

/// Environment variable that overrides `api.origin`
pub const ORIGIN_ENV: &str = "AGENTHUB_ORIGIN";

/// `$<var>` if set and non-empty, else `<home>/<fallback>`.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(fallback),
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which base-URL strategy the client uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Fixed local origin
    #[default]
    Development,
    /// Same origin as the page, with an `/api` suffix
    Production,
}

impl Mode {
    /// Parse a mode flag. Accepts `development`/`dev` and `production`/`prod`
    /// in any case.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(Error::Config(format!(
                "unknown api mode '{}': expected 'development' or 'production'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Mode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Backend API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base-URL strategy
    #[serde(default)]
    pub mode: Mode,

    /// Page origin used in production mode (e.g., `https://hub.example.com`)
    pub origin: Option<String>,

    /// Base URL used in development mode
    #[serde(default = "default_dev_base_url")]
    pub dev_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            origin: None,
            dev_base_url: default_dev_base_url(),
        }
    }
}

fn default_dev_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl ApiConfig {
    /// Apply `AGENTHUB_MODE` / `AGENTHUB_ORIGIN` overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var(MODE_ENV) {
            self.mode = Mode::parse(&mode)?;
        }
        if let Ok(origin) = std::env::var(ORIGIN_ENV) {
            if !origin.trim().is_empty() {
                self.origin = Some(origin);
            }
        }
        Ok(())
    }
}

/// Resolve the base URL every request is issued against.
///
/// Production reuses the page origin with an `/api` suffix; anything else
/// targets the fixed development URL.
pub fn resolve_base_url(config: &ApiConfig) -> Result<String> {
    match config.mode {
        Mode::Production => {
            let origin = config
                .origin
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .ok_or_else(|| {
                    Error::Config("api.origin is required in production mode".to_string())
                })?;
            Ok(format!("{}/api", origin.trim_end_matches('/')))
        }
        Mode::Development => Ok(config.dev_base_url.trim_end_matches('/').to_string()),
    }
}

/// `[logging]` table
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `agenthub_core=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Daily log files retained before the oldest is removed
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path, then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_or_default(&Self::config_path())?;
        config.api.apply_env()?;
        Ok(config)
    }

    fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        tracing::info!(path = %path.display(), "no config file; using defaults");
        Ok(Config::default())
    }

    /// Parse one TOML file. Environment overrides are not applied.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid config in {}: {}", path.display(), e)))
    }

    pub fn config_path() -> PathBuf {
        xdg_dir("XDG_CONFIG_HOME", ".config").join("agenthub/config.toml")
    }

    /// Log directory, `~/.local/state/agenthub` by default
    pub fn state_dir() -> PathBuf {
        xdg_dir("XDG_STATE_HOME", ".local/state").join("agenthub")
    }

    /// Base name of the rolling log; files on disk carry a date suffix.
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("agenthub.log")
    }

    /// Resolved base URL for the configured mode
    pub fn base_url(&self) -> Result<String> {
        resolve_base_url(&self.api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.mode, Mode::Development);
        assert_eq!(config.api.dev_base_url, "http://localhost:8000/api");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[api]
mode = "PROD"
origin = "https://hub.example.com/"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.mode, Mode::Production);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.base_url().unwrap(), "https://hub.example.com/api");
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let toml = r#"
[api]
mode = "staging"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_development_base_url() {
        let config = ApiConfig::default();
        assert_eq!(
            resolve_base_url(&config).unwrap(),
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn test_production_requires_origin() {
        let config = ApiConfig {
            mode: Mode::Production,
            ..Default::default()
        };
        assert!(matches!(resolve_base_url(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_production_keeps_port() {
        let config = ApiConfig {
            mode: Mode::Production,
            origin: Some("http://10.0.0.5:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_base_url(&config).unwrap(),
            "http://10.0.0.5:8080/api"
        );
    }

    #[test]
    fn test_mode_aliases() {
        assert_eq!(Mode::parse("dev").unwrap(), Mode::Development);
        assert_eq!(Mode::parse("Production").unwrap(), Mode::Production);
        assert!(Mode::parse("").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ndev_base_url = \"http://127.0.0.1:9000/api/\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn test_log_path_under_state_dir() {
        assert!(Config::log_path().ends_with("agenthub/agenthub.log"));
        assert!(Config::log_path().starts_with(Config::state_dir()));
    }

    #[test]
    fn test_missing_file_logged_at_info() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || Capture(Arc::clone(&sink)))
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            Config::load_or_default(&missing)
        })
        .unwrap();

        let output = String::from_utf8(lines.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INFO"), "got: {output}");
        assert!(output.contains("no config file"), "got: {output}");
        assert_eq!(config.logging.level, "info");
    }
}
