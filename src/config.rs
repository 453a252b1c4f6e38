use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Environment override tracking
// ---------------------------------------------------------------------------

/// Tracks which configuration settings are overridden by environment variables.
///
/// `mybank-pfm config` prints this next to the effective values so it is
/// clear why a file setting has no effect.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    overrides: HashMap<String, String>,
}

impl EnvOverrides {
    /// Check whether a setting key (e.g. "api.base_url") is overridden by an env var.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Get the env var name that overrides the given setting key.
    pub fn env_var_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    /// Get all overrides as a map of setting key -> env var name.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.overrides
    }

    fn record(&mut self, key: &str, env_var: &str) {
        self.overrides.insert(key.to_string(), env_var.to_string());
    }
}

// ---------------------------------------------------------------------------
// Main configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Env var overrides are not serialized to TOML.
    #[serde(skip)]
    pub env_overrides: EnvOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Session file for the `file` backend. Defaults to
    /// `<config dir>/mybank-pfm/session.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Keyring => write!(f, "keyring"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("Unknown storage backend: {s}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_base_url() -> String {
    pfm_client::config::DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    pfm_client::config::REQUEST_TIMEOUT.as_secs()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Config loading and env overrides
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a TOML file, then apply environment variable
    /// overrides. Any setting prefixed with `PFM_` takes precedence over the
    /// file value and is tracked in `env_overrides`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        let mut ov = EnvOverrides::default();

        macro_rules! env_str {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = val;
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_bool {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_parse {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    if let Ok(parsed) = val.parse() {
                        $field = parsed;
                        ov.record($key, $env);
                    }
                }
            };
        }

        // -- API --
        env_str!("api.base_url", pfm_client::config::BASE_URL_ENV, self.api.base_url);
        env_parse!("api.timeout_secs", "PFM_API_TIMEOUT_SECS", self.api.timeout_secs);

        // -- Session --
        env_parse!("session.backend", "PFM_SESSION_BACKEND", self.session.backend);
        if let Ok(val) = std::env::var("PFM_SESSION_PATH") {
            self.session.path = if val.is_empty() { None } else { Some(PathBuf::from(val)) };
            ov.record("session.path", "PFM_SESSION_PATH");
        }

        // -- Logging --
        env_str!("logging.level", "PFM_LOG_LEVEL", self.logging.level);
        env_bool!("logging.json", "PFM_LOG_JSON", self.logging.json);

        self.env_overrides = ov;
    }

    /// Effective settings as `(key, value, overriding env var)` rows.
    pub fn settings_report(&self) -> Vec<(String, String, Option<String>)> {
        let row = |key: &str, value: String| {
            (
                key.to_string(),
                value,
                self.env_overrides.env_var_for(key).map(String::from),
            )
        };
        vec![
            row("api.base_url", self.api.base_url.clone()),
            row("api.timeout_secs", self.api.timeout_secs.to_string()),
            row("session.backend", self.session.backend.to_string()),
            row(
                "session.path",
                self.session
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(default)".to_string()),
            ),
            row("logging.level", self.logging.level.clone()),
            row("logging.json", self.logging.json.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.backend, StorageBackend::File);
        assert!(config.session.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://api.mybank.example"
            timeout_secs = 5

            [session]
            backend = "memory"

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.mybank.example");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.session.backend, StorageBackend::Memory);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("file".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("KEYRING".parse::<StorageBackend>().unwrap(), StorageBackend::Keyring);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("sqlite".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Keyring.to_string(), "keyring");
    }

    #[test]
    fn test_env_overrides_tracking() {
        let mut ov = EnvOverrides::default();
        assert!(!ov.is_overridden("api.base_url"));

        ov.record("api.base_url", "PFM_API_URL");
        assert!(ov.is_overridden("api.base_url"));
        assert_eq!(ov.env_var_for("api.base_url"), Some("PFM_API_URL"));
        assert_eq!(ov.all().len(), 1);
    }

    #[test]
    fn test_env_override_applies() {
        // SAFETY: no other test reads or writes these variables.
        unsafe {
            std::env::set_var("PFM_API_TIMEOUT_SECS", "12");
            std::env::set_var("PFM_SESSION_BACKEND", "memory");
            std::env::set_var("PFM_LOG_JSON", "yes");
            std::env::set_var("PFM_SESSION_PATH", "/tmp/pfm-session.json");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.session.backend, StorageBackend::Memory);
        assert!(config.logging.json);
        assert_eq!(
            config.session.path.as_deref(),
            Some(Path::new("/tmp/pfm-session.json"))
        );
        assert!(config.env_overrides.is_overridden("api.timeout_secs"));
        assert!(config.env_overrides.is_overridden("session.backend"));
        assert!(!config.env_overrides.is_overridden("logging.level"));

        let report = config.settings_report();
        let timeout = report.iter().find(|(k, _, _)| k == "api.timeout_secs").unwrap();
        assert_eq!(timeout.2.as_deref(), Some("PFM_API_TIMEOUT_SECS"));

        unsafe {
            std::env::remove_var("PFM_API_TIMEOUT_SECS");
            std::env::remove_var("PFM_SESSION_BACKEND");
            std::env::remove_var("PFM_LOG_JSON");
            std::env::remove_var("PFM_SESSION_PATH");
        }
    }
}
