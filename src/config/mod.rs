//! Configuration management for photodeck.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default photo feed.
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/photos";

/// Records kept from each fetch.
pub const DEFAULT_PHOTO_LIMIT: usize = 100;

/// Environment variable overriding the source URL.
pub const SOURCE_URL_ENV: &str = "PHOTODECK_SOURCE_URL";

/// Environment variable holding the API token.
pub const API_TOKEN_ENV: &str = "PHOTODECK_API_TOKEN";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote photo source.
    pub source: SourceConfig,

    /// Disabled-set storage.
    pub store: StoreConfig,

    /// TUI configuration.
    pub tui: TuiConfig,

    /// API configuration.
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// Loads global config first, then merges project-local config if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let global_path = Self::config_path()?;
        let mut config = Self::load_from(&global_path)?;

        if let Ok(project_path) = Self::project_config_path() {
            if project_path.exists() {
                config.merge(Self::load_from(&project_path)?);
            }
        }

        Ok(config)
    }

    /// Load a single config file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Get the project-local configuration file path.
    ///
    /// Looks for `.photodeck/config.toml` in the current directory.
    pub fn project_config_path() -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(".photodeck").join("config.toml"))
    }

    /// Merge another config into this one (project overrides global).
    ///
    /// A project value equal to the built-in default counts as unset, so a
    /// project file cannot put a field back to its default once the global
    /// file changed it.
    fn merge(&mut self, other: Self) {
        if other.source.url.is_some() {
            self.source.url = other.source.url;
        }
        if other.source.limit != SourceConfig::default().limit {
            self.source.limit = other.source.limit;
        }
        if other.source.timeout_secs != SourceConfig::default().timeout_secs {
            self.source.timeout_secs = other.source.timeout_secs;
        }

        if other.store.dir.is_some() {
            self.store.dir = other.store.dir;
        }

        if other.tui.mouse != TuiConfig::default().mouse {
            self.tui.mouse = other.tui.mouse;
        }

        if other.api.port != ApiConfig::default().port {
            self.api.port = other.api.port;
        }
        if other.api.host != ApiConfig::default().host {
            self.api.host = other.api.host;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
    }

    /// Get the configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the config directory path (`~/.config/photodeck/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config_home).join("photodeck"));
        }

        if cfg!(target_os = "macos") {
            if let Ok(home) = std::env::var("HOME") {
                return Ok(PathBuf::from(home).join(".config").join("photodeck"));
            }
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

        Ok(base.config_dir().join("photodeck"))
    }

    /// Get the data directory path (`~/.local/share/photodeck/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn data_dir() -> anyhow::Result<PathBuf> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine data directory"))?;

        Ok(base.data_dir().join("photodeck"))
    }

    /// Log file used while the TUI owns the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn log_path() -> anyhow::Result<PathBuf> {
        Ok(Self::data_dir()?.join("photodeck.log"))
    }
}

/// Remote photo source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Endpoint returning the photo list. Falls back to
    /// `PHOTODECK_SOURCE_URL`, then the public placeholder feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Records kept from each fetch (0 keeps everything).
    pub limit: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            limit: DEFAULT_PHOTO_LIMIT,
            timeout_secs: 10,
        }
    }
}

impl SourceConfig {
    /// Resolve the endpoint, preferring env var over config file.
    #[must_use]
    pub fn url(&self) -> String {
        std::env::var(SOURCE_URL_ENV)
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string())
    }
}

/// Disabled-set storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the store slots. Defaults to `<data_dir>/storage`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Directory the store lives in.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the data directory cannot
    /// be determined.
    pub fn resolve_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Config::data_dir()?.join("storage")),
        }
    }
}

/// TUI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Enable mouse wheel scrolling.
    pub mouse: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to bind to.
    pub port: u16,

    /// API token for authentication (optional, but required for remote access).
    /// Can also be set via `PHOTODECK_API_TOKEN` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7891,
            token: None,
        }
    }
}

impl ApiConfig {
    /// Get the API token, preferring env var over config file.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .or_else(|| self.token.clone())
    }

    /// Generate a new random API token.
    #[must_use]
    pub fn generate_token() -> String {
        use rand::Rng;
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        format!("pd_{}", hex::encode(bytes))
    }
}
